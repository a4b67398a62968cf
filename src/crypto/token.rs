//! HS256 bearer tokens in JWT compact form.
//!
//! ```text
//! base64url(header) "." base64url(payload) "." base64url(HMAC-SHA256(secret, first two segments))
//! ```
//!
//! All segments are unpadded base64url.  The header is always
//! `{"alg":"HS256","typ":"JWT"}` and the payload carries
//! `{"userId", "username", "exp"}` with `exp` in unix seconds.
//!
//! Tokens are stateless: there is no revocation list, so a token stays
//! valid until `exp` even if the user's password changes.

use std::time::Duration;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use crate::errors::{CredVaultError, Result};

/// Default token lifetime: 24 hours.
pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

const ALGORITHM: &str = "HS256";
const TOKEN_TYPE: &str = "JWT";

#[derive(Debug, Serialize, Deserialize)]
struct Header {
    alg: String,
    typ: String,
}

/// Claims embedded in a token's payload segment.
///
/// Field order matters: it fixes the serialized payload to
/// `{"userId":..,"username":..,"exp":..}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub user_id: String,
    pub username: String,
    pub exp: i64,
}

/// Issues and validates tokens under one shared secret.
pub struct TokenSigner {
    secret: Zeroizing<Vec<u8>>,
    ttl: Duration,
}

impl TokenSigner {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            secret: Zeroizing::new(secret.to_vec()),
            ttl,
        }
    }

    /// Issue a token that expires `ttl` from now.
    pub fn issue(&self, user_id: &str, username: &str) -> Result<String> {
        self.issue_at(user_id, username, now_unix())
    }

    /// Issue a token as if the current time were `now` (unix seconds).
    pub fn issue_at(&self, user_id: &str, username: &str, now: i64) -> Result<String> {
        let ttl = i64::try_from(self.ttl.as_secs()).unwrap_or(i64::MAX);
        let claims = Claims {
            user_id: user_id.to_string(),
            username: username.to_string(),
            exp: now.saturating_add(ttl),
        };
        let header = Header {
            alg: ALGORITHM.to_string(),
            typ: TOKEN_TYPE.to_string(),
        };

        let header_json = serde_json::to_vec(&header)
            .map_err(|e| CredVaultError::Serialization(format!("token header: {e}")))?;
        let payload_json = serde_json::to_vec(&claims)
            .map_err(|e| CredVaultError::Serialization(format!("token payload: {e}")))?;

        let signing_input = format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(header_json),
            URL_SAFE_NO_PAD.encode(payload_json)
        );
        let signature = self.sign(&signing_input)?;

        Ok(format!("{signing_input}.{signature}"))
    }

    /// Return the user id of a valid, unexpired token.
    ///
    /// Never errors: any malformed, forged or expired token yields `None`.
    pub fn validate(&self, token: &str) -> Option<String> {
        self.validate_at(token, now_unix())
    }

    /// `validate` against an explicit clock.
    pub fn validate_at(&self, token: &str, now: i64) -> Option<String> {
        self.claims_at(token, now).map(|claims| claims.user_id)
    }

    /// Full claim set of a valid token.
    pub fn claims(&self, token: &str) -> Option<Claims> {
        self.claims_at(token, now_unix())
    }

    fn claims_at(&self, token: &str, now: i64) -> Option<Claims> {
        let mut parts = token.split('.');
        let (header_b64, payload_b64, signature) =
            match (parts.next(), parts.next(), parts.next(), parts.next()) {
                (Some(h), Some(p), Some(s), None) => (h, p, s),
                _ => return None,
            };

        let header_json = URL_SAFE_NO_PAD.decode(header_b64).ok()?;
        let header: Header = serde_json::from_slice(&header_json).ok()?;
        if header.alg != ALGORITHM {
            return None;
        }

        let expected = self.sign(&format!("{header_b64}.{payload_b64}")).ok()?;
        if !bool::from(expected.as_bytes().ct_eq(signature.as_bytes())) {
            return None;
        }

        let payload_json = URL_SAFE_NO_PAD.decode(payload_b64).ok()?;
        let claims: Claims = serde_json::from_slice(&payload_json).ok()?;

        if now > claims.exp {
            return None;
        }

        Some(claims)
    }

    fn sign(&self, data: &str) -> Result<String> {
        let mut mac = Hmac::<Sha256>::new_from_slice(&self.secret)
            .map_err(|e| CredVaultError::EncryptionFailed(format!("invalid HMAC key: {e}")))?;
        mac.update(data.as_bytes());
        Ok(URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes()))
    }
}

fn now_unix() -> i64 {
    chrono::Utc::now().timestamp()
}
