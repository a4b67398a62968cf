//! User-scoped CRUD over the secret store.
//!
//! `VaultManager` encrypts on write and decrypts on read with the key it
//! was constructed with.  It trusts the `user_id` it is given; checking
//! the caller's token is the dispatcher's job.

use std::sync::Arc;

use crate::crypto::{decrypt, encrypt, CipherKey};
use crate::errors::{CredVaultError, Result};
use crate::store::{EntryUpdate, SecretStore, VaultEntry};

use super::entry::DecryptedEntry;

pub struct VaultManager {
    entries: SecretStore,
    key: Arc<CipherKey>,
}

impl VaultManager {
    pub fn new(entries: SecretStore, key: Arc<CipherKey>) -> Self {
        Self { entries, key }
    }

    /// All of the user's entries, decrypted, in insertion order.
    ///
    /// A single entry that fails to decrypt fails the whole listing.
    pub fn list(&self, user_id: &str) -> Result<Vec<DecryptedEntry>> {
        self.entries
            .list_owned(user_id)?
            .into_iter()
            .map(|entry| self.reveal(entry))
            .collect()
    }

    /// Fetch one owned entry, decrypted.
    pub fn get(&self, user_id: &str, entry_id: &str) -> Result<DecryptedEntry> {
        let entry = self
            .entries
            .get_owned(user_id, entry_id)?
            .ok_or(CredVaultError::NotFound)?;
        self.reveal(entry)
    }

    /// Encrypt `secret` and store a new entry owned by `user_id`.
    pub fn add(
        &self,
        user_id: &str,
        site: &str,
        username: &str,
        secret: &str,
    ) -> Result<VaultEntry> {
        validate_fields(site, username, secret)?;

        let encrypted = encrypt(&self.key, secret)?;
        let entry = self.entries.insert(user_id, site, username, encrypted)?;

        tracing::info!(user_id, entry_id = %entry.id, "vault entry added");
        Ok(entry)
    }

    /// Replace an owned entry.  `false` means not found (or not yours).
    pub fn update(
        &self,
        user_id: &str,
        entry_id: &str,
        site: &str,
        username: &str,
        secret: &str,
    ) -> Result<bool> {
        validate_fields(site, username, secret)?;

        let encrypted_secret = encrypt(&self.key, secret)?;
        let updated = self.entries.update_owned(
            user_id,
            entry_id,
            EntryUpdate {
                site: site.to_string(),
                username: username.to_string(),
                encrypted_secret,
            },
        )?;

        if updated {
            tracing::info!(user_id, entry_id, "vault entry updated");
        } else {
            tracing::debug!(user_id, entry_id, "update matched no owned entry");
        }
        Ok(updated)
    }

    /// Remove an owned entry.  `false` means not found (or not yours).
    pub fn delete(&self, user_id: &str, entry_id: &str) -> Result<bool> {
        let deleted = self.entries.remove_owned(user_id, entry_id)?;

        if deleted {
            tracing::info!(user_id, entry_id, "vault entry deleted");
        } else {
            tracing::debug!(user_id, entry_id, "delete matched no owned entry");
        }
        Ok(deleted)
    }

    fn reveal(&self, entry: VaultEntry) -> Result<DecryptedEntry> {
        let secret = decrypt(&self.key, &entry.encrypted_secret).map_err(|e| {
            tracing::error!(entry_id = %entry.id, "vault entry failed to decrypt");
            e
        })?;

        Ok(DecryptedEntry {
            id: entry.id,
            site: entry.site,
            username: entry.username,
            secret,
            created_at: entry.created_at,
            updated_at: entry.updated_at,
        })
    }
}

fn validate_fields(site: &str, username: &str, secret: &str) -> Result<()> {
    if site.is_empty() || username.is_empty() || secret.is_empty() {
        return Err(CredVaultError::Validation(
            "Site, username, and password required".into(),
        ));
    }
    Ok(())
}
