//! Secret store: the persisted list of encrypted vault entries.
//!
//! Every lookup that reads, changes or removes a single entry matches on
//! both the entry id and the owner id.  An entry owned by someone else
//! behaves exactly like one that does not exist.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::file::{Change, JsonFileStore};
use crate::errors::Result;

/// One stored secret.  `encrypted_secret` is the cipher service output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultEntry {
    pub id: String,

    /// Older files call this `userId`.
    #[serde(alias = "userId")]
    pub owner_user_id: String,

    pub site: String,

    pub username: String,

    /// base64(IV || ciphertext).  Older files call this `password`.
    #[serde(alias = "password")]
    pub encrypted_secret: String,

    pub created_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Replacement values for an in-place update.
pub struct EntryUpdate {
    pub site: String,
    pub username: String,
    pub encrypted_secret: String,
}

pub struct SecretStore {
    file: JsonFileStore<VaultEntry>,
}

impl SecretStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file: JsonFileStore::new(path),
        }
    }

    /// Entries owned by `owner`, in insertion order.
    pub fn list_owned(&self, owner: &str) -> Result<Vec<VaultEntry>> {
        Ok(self
            .file
            .load()?
            .into_iter()
            .filter(|e| e.owner_user_id == owner)
            .collect())
    }

    pub fn get_owned(&self, owner: &str, entry_id: &str) -> Result<Option<VaultEntry>> {
        Ok(self
            .file
            .load()?
            .into_iter()
            .find(|e| e.id == entry_id && e.owner_user_id == owner))
    }

    /// Append a new entry with a freshly allocated id.
    pub fn insert(
        &self,
        owner: &str,
        site: &str,
        username: &str,
        encrypted_secret: String,
    ) -> Result<VaultEntry> {
        self.file.mutate_with_ids(|entries, ids| {
            let entry = VaultEntry {
                id: ids.next(entries.iter().map(|e| e.id.as_str()))?,
                owner_user_id: owner.to_string(),
                site: site.to_string(),
                username: username.to_string(),
                encrypted_secret,
                created_at: Utc::now(),
                updated_at: None,
            };
            entries.push(entry.clone());
            Ok(Change::Write(entry))
        })
    }

    /// Replace site/username/secret of an owned entry and stamp `updated_at`.
    /// Returns `false` without touching the file if no owned entry matches.
    pub fn update_owned(&self, owner: &str, entry_id: &str, update: EntryUpdate) -> Result<bool> {
        self.file.mutate(|entries| {
            match entries
                .iter_mut()
                .find(|e| e.id == entry_id && e.owner_user_id == owner)
            {
                Some(entry) => {
                    entry.site = update.site;
                    entry.username = update.username;
                    entry.encrypted_secret = update.encrypted_secret;
                    entry.updated_at = Some(Utc::now());
                    Ok(Change::Write(true))
                }
                None => Ok(Change::Keep(false)),
            }
        })
    }

    /// Remove an owned entry.  Returns `false` if none matched.
    pub fn remove_owned(&self, owner: &str, entry_id: &str) -> Result<bool> {
        self.file.mutate(|entries| {
            let before = entries.len();
            entries.retain(|e| !(e.id == entry_id && e.owner_user_id == owner));

            if entries.len() < before {
                Ok(Change::Write(true))
            } else {
                Ok(Change::Keep(false))
            }
        })
    }

    /// Every entry regardless of owner (maintenance and tests only).
    pub fn all(&self) -> Result<Vec<VaultEntry>> {
        self.file.load()
    }

    /// Create an empty `passwords.json` if none exists.
    pub fn ensure_exists(&self) -> Result<()> {
        self.file.ensure_exists()
    }
}
