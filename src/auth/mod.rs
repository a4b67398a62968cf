//! Authentication engine: registration, credential checks and tokens.
//!
//! `authenticate` answers `None` both for an unknown username and for a
//! wrong password so callers cannot tell the two apart.

use crate::crypto::{generate_salt, Claims, PasswordHasher, TokenSigner};
use crate::errors::{CredVaultError, Result};
use crate::store::{CredentialStore, NewUser, User};

pub struct AuthEngine {
    users: CredentialStore,
    hasher: PasswordHasher,
    signer: TokenSigner,
}

impl AuthEngine {
    pub fn new(users: CredentialStore, hasher: PasswordHasher, signer: TokenSigner) -> Self {
        Self {
            users,
            hasher,
            signer,
        }
    }

    pub fn user_exists(&self, username: &str) -> Result<bool> {
        self.users.exists(username)
    }

    /// Register a new user.
    ///
    /// Fails with `Validation` on a blank username or password and with
    /// `Conflict` if the username is already taken.
    pub fn register(&self, username: &str, password: &str) -> Result<User> {
        if username.trim().is_empty() || password.trim().is_empty() {
            return Err(CredVaultError::Validation(
                "Username and password required".into(),
            ));
        }

        let salt = generate_salt();
        let password_hash = self.hasher.hash(password, &salt)?;

        let user = self.users.register(NewUser {
            username: username.to_string(),
            password_hash,
            salt,
            hash_scheme: self.hasher.scheme(),
        })?;

        tracing::info!(user_id = %user.id, username = %user.username, "user registered");
        Ok(user)
    }

    /// Check credentials and issue a token on success.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<Option<String>> {
        let Some(user) = self.users.find(username)? else {
            tracing::warn!(username, "login rejected: unknown user");
            return Ok(None);
        };

        let matches =
            self.hasher
                .verify(user.hash_scheme, password, &user.salt, &user.password_hash)?;
        if !matches {
            tracing::warn!(username, "login rejected: wrong password");
            return Ok(None);
        }

        let token = self.signer.issue(&user.id, &user.username)?;
        tracing::info!(user_id = %user.id, "token issued");
        Ok(Some(token))
    }

    /// User id carried by a valid token, `None` for anything else.
    pub fn validate(&self, token: &str) -> Option<String> {
        self.signer.validate(token)
    }

    /// `validate` against an explicit clock (unix seconds).
    pub fn validate_at(&self, token: &str, now: i64) -> Option<String> {
        self.signer.validate_at(token, now)
    }

    pub fn claims(&self, token: &str) -> Option<Claims> {
        self.signer.claims(token)
    }
}
