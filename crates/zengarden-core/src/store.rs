//! Durable key-value storage for the save blob.
//!
//! The [`StateStore`] trait abstracts where the single save string lives.
//! [`FileStore`] keeps one JSON file per key on disk; [`MemoryStore`] keeps
//! everything in a map and backs tests and embedded hosts.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::PersistenceError;

/// A string store addressed by key.
///
/// Implementations are synchronous; the controller calls them inline after
/// each mutating action.
pub trait StateStore {
    /// Read the blob under `key`, or `None` if nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] if the store cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    /// Replace the blob under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] if the store rejects the write.
    fn write(&mut self, key: &str, blob: &str) -> Result<(), PersistenceError>;

    /// Delete the blob under `key`. Removing a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] if the store cannot be modified.
    fn remove(&mut self, key: &str) -> Result<(), PersistenceError>;
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// In-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    /// An empty store.
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// A store pre-seeded with one blob.
    pub fn with_entry(key: impl Into<String>, blob: impl Into<String>) -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(key.into(), blob.into());
        Self { entries }
    }

    /// Borrow the blob under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl StateStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, blob: &str) -> Result<(), PersistenceError> {
        self.entries.insert(key.to_owned(), blob.to_owned());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistenceError> {
        self.entries.remove(key);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FileStore
// ---------------------------------------------------------------------------

/// One `<key>.json` file per key inside a directory.
///
/// Writes go to a temporary sibling first and are renamed into place, so a
/// crash mid-write leaves the previous save intact.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// A store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The directory holding the save files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

fn io_error(key: &str, source: std::io::Error) -> PersistenceError {
    PersistenceError::Io {
        key: key.to_owned(),
        source,
    }
}

impl StateStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(blob) => Ok(Some(blob)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(io_error(key, err)),
        }
    }

    fn write(&mut self, key: &str, blob: &str) -> Result<(), PersistenceError> {
        std::fs::create_dir_all(&self.dir).map_err(|err| io_error(key, err))?;
        let target = self.path_for(key);
        let staging = self.dir.join(format!("{key}.json.tmp"));
        std::fs::write(&staging, blob).map_err(|err| io_error(key, err))?;
        std::fs::rename(&staging, &target).map_err(|err| io_error(key, err))
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistenceError> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(io_error(key, err)),
        }
    }
}
