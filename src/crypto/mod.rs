//! Cryptographic primitives for credvault.
//!
//! This module provides:
//! - AES-256-CBC encryption of vault secrets and the persisted key (`cipher`)
//! - Salted password hashing for user records (`password`)
//! - HS256 bearer token issuance and validation (`token`)

pub mod cipher;
pub mod password;
pub mod token;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{encrypt, decrypt, CipherKey, ...};
pub use cipher::{decrypt, encrypt, CipherKey};
pub use password::{generate_salt, Argon2Params, HashScheme, PasswordHasher};
pub use token::{Claims, TokenSigner};
