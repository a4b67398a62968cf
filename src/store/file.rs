//! Whole-collection JSON file persistence.
//!
//! A `JsonFileStore<T>` owns one file holding a JSON array of `T`.
//! Every mutation runs load → mutate → save while holding an exclusive
//! OS lock on the sidecar `<file>.lock`; reads hold the shared lock.
//! The lock is taken per call, so separate processes (one per CLI
//! command) are serialized just like threads sharing one store.
//! Saves go through a uniquely named temp file + rename so the file on
//! disk is always either the old or the new collection.
//!
//! The sidecar also records the highest id ever allocated, so ids of
//! deleted records are never handed out again.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tempfile::NamedTempFile;

use super::IdSequence;
use crate::errors::{CredVaultError, Result};

/// What a mutation closure decided to do with the loaded collection.
pub enum Change<R> {
    /// Persist the (modified) collection and return the value.
    Write(R),
    /// Leave the file untouched and return the value.
    Keep(R),
}

pub struct JsonFileStore<T> {
    path: PathBuf,
    lock_path: PathBuf,
    /// In-process gate in front of the OS lock.
    lock: RwLock<()>,
    _records: PhantomData<fn() -> T>,
}

impl<T> JsonFileStore<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut lock_name = path.file_name().unwrap_or_default().to_os_string();
        lock_name.push(".lock");
        let lock_path = path.with_file_name(lock_name);

        Self {
            path,
            lock_path,
            lock: RwLock::new(()),
            _records: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn lock_path(&self) -> &Path {
        &self.lock_path
    }

    /// Load the full collection.  A missing or blank file is empty.
    pub fn load(&self) -> Result<Vec<T>> {
        let _guard = self.lock.read();
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let lock = fd_lock::RwLock::new(self.open_lock_file()?);
        let _file_guard = lock.read()?;
        self.read_file()
    }

    /// Run `f` over the current collection while holding the write lock.
    pub fn mutate<R, F>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&mut Vec<T>) -> Result<Change<R>>,
    {
        self.mutate_with_ids(|records, _| f(records))
    }

    /// Like `mutate`, with access to the store's id sequence.  Ids the
    /// closure allocates are remembered only if the change is written.
    pub fn mutate_with_ids<R, F>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&mut Vec<T>, &mut IdSequence) -> Result<Change<R>>,
    {
        let _guard = self.lock.write();
        let mut lock = fd_lock::RwLock::new(self.open_lock_file()?);
        let mut lock_file = lock.write()?;

        let mut ids = IdSequence::read_from(&mut *lock_file)?;
        let mut records = self.read_file()?;

        match f(&mut records, &mut ids)? {
            Change::Write(value) => {
                self.write_file(&records)?;
                ids.write_to(&mut *lock_file)?;
                Ok(value)
            }
            Change::Keep(value) => Ok(value),
        }
    }

    /// Create the file with an empty array if it does not exist yet.
    pub fn ensure_exists(&self) -> Result<()> {
        let _guard = self.lock.write();
        let mut lock = fd_lock::RwLock::new(self.open_lock_file()?);
        let _file_guard = lock.write()?;

        if self.path.exists() {
            return Ok(());
        }
        self.write_file(&[])
    }

    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        }
    }

    fn open_lock_file(&self) -> Result<File> {
        let parent = self.parent_dir();
        if !parent.exists() {
            fs::create_dir_all(parent)?;
        }

        Ok(OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.lock_path)?)
    }

    fn read_file(&self) -> Result<Vec<T>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let contents = fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&contents)
            .map_err(|e| CredVaultError::CorruptStore(self.path.clone(), e.to_string()))
    }

    fn write_file(&self, records: &[T]) -> Result<()> {
        let json = serde_json::to_vec_pretty(records)
            .map_err(|e| CredVaultError::Serialization(e.to_string()))?;

        // Temp file in the same directory so the rename stays atomic.
        let mut tmp = NamedTempFile::new_in(self.parent_dir())?;
        tmp.write_all(&json)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;

        tracing::debug!(
            path = %self.path.display(),
            records = records.len(),
            "store saved"
        );
        Ok(())
    }
}
