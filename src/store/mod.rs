//! Persisted collections.
//!
//! This module provides:
//! - A locked, atomically rewritten JSON file store (`file`)
//! - The credential store of user records (`users`)
//! - The secret store of encrypted vault entries (`entries`)

pub mod entries;
pub mod file;
pub mod users;

pub use entries::{EntryUpdate, SecretStore, VaultEntry};
pub use file::{Change, JsonFileStore};
pub use users::{CredentialStore, NewUser, User};

use std::fs::File;
use std::io::{Read, Seek, SeekFrom, Write};

use chrono::Utc;

use crate::errors::{CredVaultError, Result};

/// Record id allocator: the current time in milliseconds, bumped past
/// every numeric id in use and past the highest id ever handed out.
///
/// The high-water mark lives in the store's lock file, so an id freed
/// by a delete is never reused, not even by another process.
#[derive(Debug, Default)]
pub struct IdSequence {
    last: u64,
    dirty: bool,
}

impl IdSequence {
    /// Read the high-water mark.  An empty or unreadable mark counts as 0.
    pub(crate) fn read_from(file: &mut File) -> Result<Self> {
        let mut contents = String::new();
        file.seek(SeekFrom::Start(0))?;
        file.read_to_string(&mut contents)?;

        let last = match contents.trim() {
            "" => 0,
            raw => raw.parse().unwrap_or_else(|_| {
                tracing::debug!(raw, "ignoring unreadable id high-water mark");
                0
            }),
        };
        Ok(Self { last, dirty: false })
    }

    /// Persist the high-water mark if an id was allocated.
    pub(crate) fn write_to(&self, file: &mut File) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }
        file.set_len(0)?;
        file.seek(SeekFrom::Start(0))?;
        file.write_all(self.last.to_string().as_bytes())?;
        Ok(())
    }

    /// Allocate the next id given the ids currently stored.
    pub fn next<'a>(&mut self, existing: impl Iterator<Item = &'a str>) -> Result<String> {
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
        let highest = existing
            .filter_map(|id| id.parse::<u64>().ok())
            .fold(self.last, u64::max);

        let id = if highest >= now {
            highest
                .checked_add(1)
                .ok_or_else(|| CredVaultError::Serialization("record id space exhausted".into()))?
        } else {
            now
        };

        self.last = id;
        self.dirty = true;
        Ok(id.to_string())
    }
}
