//! Credential store: the persisted list of registered users.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::file::{Change, JsonFileStore};
use crate::crypto::HashScheme;
use crate::errors::{CredVaultError, Result};

/// A registered user.  Immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,

    /// Case-sensitive, unique across the store.
    pub username: String,

    /// Base64 digest of `salt || password`.  Older files call this `password`.
    #[serde(alias = "password")]
    pub password_hash: String,

    /// Base64 encoded random salt.
    pub salt: String,

    pub created_at: DateTime<Utc>,

    /// Omitted for the default SHA-256 scheme.
    #[serde(default, skip_serializing_if = "HashScheme::is_default")]
    pub hash_scheme: HashScheme,
}

/// Fields of a new user, minus the id the store allocates.
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub salt: String,
    pub hash_scheme: HashScheme,
}

pub struct CredentialStore {
    file: JsonFileStore<User>,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file: JsonFileStore::new(path),
        }
    }

    pub fn exists(&self, username: &str) -> Result<bool> {
        Ok(self.file.load()?.iter().any(|u| u.username == username))
    }

    /// Linear scan for an exact username match.
    pub fn find(&self, username: &str) -> Result<Option<User>> {
        Ok(self
            .file
            .load()?
            .into_iter()
            .find(|u| u.username == username))
    }

    /// All users in registration order.
    pub fn all(&self) -> Result<Vec<User>> {
        self.file.load()
    }

    /// Append a fully built record.  Fails if the username is taken.
    pub fn append(&self, user: User) -> Result<()> {
        self.file.mutate(|users| {
            if users.iter().any(|u| u.username == user.username) {
                return Err(username_taken(&user.username));
            }
            users.push(user);
            Ok(Change::Write(()))
        })
    }

    /// Check uniqueness, allocate an id and append, all under one lock.
    pub fn register(&self, new_user: NewUser) -> Result<User> {
        self.file.mutate_with_ids(|users, ids| {
            if users.iter().any(|u| u.username == new_user.username) {
                return Err(username_taken(&new_user.username));
            }

            let user = User {
                id: ids.next(users.iter().map(|u| u.id.as_str()))?,
                username: new_user.username,
                password_hash: new_user.password_hash,
                salt: new_user.salt,
                created_at: Utc::now(),
                hash_scheme: new_user.hash_scheme,
            };
            users.push(user.clone());
            Ok(Change::Write(user))
        })
    }

    /// Create an empty `users.json` if none exists.
    pub fn ensure_exists(&self) -> Result<()> {
        self.file.ensure_exists()
    }
}

fn username_taken(username: &str) -> CredVaultError {
    CredVaultError::Conflict(format!("User '{username}' already exists"))
}
