//! Wiring: build the auth engine and vault manager from `Settings`.
//!
//! The two engines share nothing but the data directory.  The vault key
//! is loaded (or generated) exactly once here and handed to the vault
//! manager.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::auth::AuthEngine;
use crate::config::Settings;
use crate::crypto::{CipherKey, PasswordHasher, TokenSigner};
use crate::errors::Result;
use crate::store::{CredentialStore, SecretStore};
use crate::vault::VaultManager;

pub struct App {
    pub auth: AuthEngine,
    pub vault: VaultManager,
    data_dir: PathBuf,
    #[cfg(feature = "audit-log")]
    audit: Option<crate::audit::AuditLog>,
}

impl App {
    /// Open the data directory described by `settings`, creating the
    /// directory, empty stores and the vault key on first use.
    pub fn open(settings: &Settings) -> Result<Self> {
        let data_dir = settings.data_dir();
        if !data_dir.exists() {
            fs::create_dir_all(&data_dir)?;
            tracing::info!(path = %data_dir.display(), "created data directory");
        }

        let key = Arc::new(CipherKey::load_or_generate(&settings.key_path())?);
        Self::with_key(settings, key)
    }

    /// Like `open`, but with an explicit vault key instead of the key file.
    pub fn with_key(settings: &Settings, key: Arc<CipherKey>) -> Result<Self> {
        let data_dir = settings.data_dir();

        let users = CredentialStore::new(settings.users_path());
        let entries = SecretStore::new(settings.entries_path());
        users.ensure_exists()?;
        entries.ensure_exists()?;

        let hasher = PasswordHasher::new(settings.password_scheme, settings.argon2_params());
        let signer = TokenSigner::new(
            settings.token_secret().as_bytes(),
            Duration::from_secs(settings.token_ttl_secs),
        );

        Ok(Self {
            auth: AuthEngine::new(users, hasher, signer),
            vault: VaultManager::new(entries, key),
            #[cfg(feature = "audit-log")]
            audit: crate::audit::AuditLog::open(&data_dir),
            data_dir,
        })
    }

    pub fn data_dir(&self) -> &std::path::Path {
        &self.data_dir
    }

    /// Record an operation in the audit log when it is compiled in and
    /// available.  Never fails.
    pub fn record(
        &self,
        operation: &str,
        user_id: Option<&str>,
        entry_id: Option<&str>,
        details: &str,
    ) {
        #[cfg(feature = "audit-log")]
        if let Some(audit) = &self.audit {
            audit.log(operation, user_id, entry_id, Some(details));
        }

        #[cfg(not(feature = "audit-log"))]
        let _ = (operation, user_id, entry_id, details);
    }

    #[cfg(feature = "audit-log")]
    pub fn audit_log(&self) -> Option<&crate::audit::AuditLog> {
        self.audit.as_ref()
    }
}
