use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur in credvault.
#[derive(Debug, Error)]
pub enum CredVaultError {
    // --- Caller errors ---
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    /// Bad credentials or a rejected token. Never says which.
    #[error("Authentication failed")]
    AuthenticationFailed,

    /// Entry absent or owned by someone else. Never says which.
    #[error("Entry not found")]
    NotFound,

    // --- Crypto errors ---
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Decryption failed — wrong key or corrupted data")]
    DecryptionFailed,

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    #[error("Encryption key error: {0}")]
    KeyError(String),

    // --- Persistence errors ---
    #[error("Store file {0} is corrupted: {1}")]
    CorruptStore(PathBuf, String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- Audit errors ---
    #[error("Audit error: {0}")]
    AuditError(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),
}

impl CredVaultError {
    /// True for failures of the persisted stores (I/O or unreadable content).
    pub fn is_persistence(&self) -> bool {
        matches!(
            self,
            Self::Io(_) | Self::CorruptStore(..) | Self::Serialization(_)
        )
    }
}

/// Convenience type alias for credvault results.
pub type Result<T> = std::result::Result<T, CredVaultError>;
