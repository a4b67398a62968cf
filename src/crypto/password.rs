//! Salted password hashing for user records.
//!
//! Two schemes are supported:
//!
//! - `Sha256` (default): `base64(SHA-256(salt || password))`, where `salt`
//!   is the *base64 string* stored in the record.  This is a single,
//!   non-iterated digest and is weak against offline guessing; it is kept
//!   because existing `users.json` files were written with it.
//! - `Argon2id` (opt-in): the same salt string fed to Argon2id.  Enabling
//!   it changes the stored hashes of newly registered users.

use argon2::{Algorithm, Argon2, Params, Version};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::errors::{CredVaultError, Result};

/// Number of random salt bytes (before base64 encoding).
const SALT_LEN: usize = 16;

/// Length of an Argon2id output hash in bytes.
const ARGON2_HASH_LEN: usize = 32;

/// Minimum safe Argon2 memory cost in KiB (8 MB).
const MIN_MEMORY_KIB: u32 = 8_192;

/// Which digest produced a stored password hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashScheme {
    #[default]
    Sha256,
    Argon2id,
}

impl HashScheme {
    pub fn is_default(&self) -> bool {
        *self == Self::Sha256
    }
}

/// Configurable Argon2id parameters.
#[derive(Debug, Clone, Copy)]
pub struct Argon2Params {
    /// Memory cost in KiB.
    pub memory_kib: u32,
    /// Number of iterations.
    pub iterations: u32,
    /// Parallelism lanes.
    pub parallelism: u32,
}

impl Default for Argon2Params {
    fn default() -> Self {
        Self {
            memory_kib: 19_456,
            iterations: 2,
            parallelism: 1,
        }
    }
}

/// Hashes and verifies passwords with a fixed scheme for new records.
#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordHasher {
    scheme: HashScheme,
    argon2: Argon2Params,
}

impl PasswordHasher {
    pub fn new(scheme: HashScheme, argon2: Argon2Params) -> Self {
        Self { scheme, argon2 }
    }

    /// Scheme used for newly hashed passwords.
    pub fn scheme(&self) -> HashScheme {
        self.scheme
    }

    /// Hash `password` with the configured scheme.
    pub fn hash(&self, password: &str, salt: &str) -> Result<String> {
        self.hash_with(self.scheme, password, salt)
    }

    /// Hash `password` with an explicit scheme (used when verifying a
    /// record that was created under a different configuration).
    pub fn hash_with(&self, scheme: HashScheme, password: &str, salt: &str) -> Result<String> {
        match scheme {
            HashScheme::Sha256 => Ok(sha256_hash(password, salt)),
            HashScheme::Argon2id => argon2_hash(password, salt, &self.argon2),
        }
    }

    /// Recompute the hash and compare it to `expected` in constant time.
    pub fn verify(
        &self,
        scheme: HashScheme,
        password: &str,
        salt: &str,
        expected: &str,
    ) -> Result<bool> {
        let actual = self.hash_with(scheme, password, salt)?;
        Ok(actual.as_bytes().ct_eq(expected.as_bytes()).into())
    }
}

/// Generate a random salt, base64 encoded for storage.
pub fn generate_salt() -> String {
    let mut salt = [0u8; SALT_LEN];
    rand::rng().fill_bytes(&mut salt);
    BASE64.encode(salt)
}

fn sha256_hash(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    BASE64.encode(hasher.finalize())
}

fn argon2_hash(password: &str, salt: &str, argon2_params: &Argon2Params) -> Result<String> {
    if argon2_params.memory_kib < MIN_MEMORY_KIB {
        return Err(CredVaultError::KeyDerivationFailed(format!(
            "Argon2 memory_kib must be at least {MIN_MEMORY_KIB} (got {})",
            argon2_params.memory_kib
        )));
    }

    let params = Params::new(
        argon2_params.memory_kib,
        argon2_params.iterations,
        argon2_params.parallelism,
        Some(ARGON2_HASH_LEN),
    )
    .map_err(|e| CredVaultError::KeyDerivationFailed(format!("invalid Argon2 params: {e}")))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut out = [0u8; ARGON2_HASH_LEN];
    argon2
        .hash_password_into(password.as_bytes(), salt.as_bytes(), &mut out)
        .map_err(|e| CredVaultError::KeyDerivationFailed(format!("Argon2id hashing failed: {e}")))?;

    Ok(BASE64.encode(out))
}
