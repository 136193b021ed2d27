//! Key-value storage backing the local data source.
//!
//! Each marketplace collection is stored as one JSON document under a fixed
//! key. Two backends exist:
//!
//! - [`MemoryKv`] - process-local map, lost on restart (the default)
//! - [`FileKv`] - one `<key>.json` file per key inside a data directory
//!
//! Keys are restricted to `[A-Za-z0-9_-]` so a key can never escape the data
//! directory.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use thiserror::Error;

/// Storage operation errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error on key {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// Key contains characters outside `[A-Za-z0-9_-]`.
    #[error("invalid storage key: {0}")]
    InvalidKey(String),

    /// The in-memory map's lock was poisoned by a panicking writer.
    #[error("storage lock poisoned")]
    Poisoned,

    /// The blocking task running a storage call panicked or was cancelled.
    #[error("storage task failed: {0}")]
    TaskFailed(String),
}

/// A string-to-string store.
pub trait KeyValueStore: Send + Sync {
    /// Read a key, returning `None` if it has never been written.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a key, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a key. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// All keys currently stored, sorted.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be listed.
    fn keys(&self) -> Result<Vec<String>, StorageError>;
}

fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

// =============================================================================
// In-memory backend
// =============================================================================

/// Process-local store.
#[derive(Debug, Default)]
pub struct MemoryKv {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryKv {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKv {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        validate_key(key)?;
        let entries = self.entries.read().map_err(|_| StorageError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        let mut entries = self.entries.write().map_err(|_| StorageError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        let mut entries = self.entries.write().map_err(|_| StorageError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        let entries = self.entries.read().map_err(|_| StorageError::Poisoned)?;
        Ok(entries.keys().cloned().collect())
    }
}

// =============================================================================
// File backend
// =============================================================================

/// Directory-backed store: key `blife_products` lives in `blife_products.json`.
#[derive(Debug, Clone)]
pub struct FileKv {
    dir: PathBuf,
}

impl FileKv {
    /// Open (creating if needed) a data directory.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|source| StorageError::Io {
            key: dir.display().to_string(),
            source,
        })?;
        Ok(Self { dir })
    }

    /// The data directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileKv {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        validate_key(key)?;
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        // Write-then-rename so a crash never leaves a truncated document.
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        let io_err = |source| StorageError::Io {
            key: key.to_string(),
            source,
        };
        std::fs::write(&tmp, value).map_err(io_err)?;
        std::fs::rename(&tmp, self.path_for(key)).map_err(io_err)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        let entries = std::fs::read_dir(&self.dir).map_err(|source| StorageError::Io {
            key: self.dir.display().to_string(),
            source,
        })?;

        let mut keys: Vec<String> = entries
            .filter_map(Result::ok)
            .filter_map(|entry| {
                let name = entry.file_name().into_string().ok()?;
                let key = name.strip_suffix(".json")?;
                validate_key(key).ok()?;
                Some(key.to_string())
            })
            .collect();
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn exercise(store: &dyn KeyValueStore) {
        assert_eq!(store.get("blife_logs").unwrap(), None);

        store.set("blife_logs", "[]").unwrap();
        store.set("blife_orders", "[1]").unwrap();
        assert_eq!(store.get("blife_logs").unwrap().as_deref(), Some("[]"));
        assert_eq!(store.keys().unwrap(), vec!["blife_logs", "blife_orders"]);

        store.set("blife_logs", "[2]").unwrap();
        assert_eq!(store.get("blife_logs").unwrap().as_deref(), Some("[2]"));

        store.remove("blife_logs").unwrap();
        store.remove("blife_logs").unwrap();
        assert_eq!(store.get("blife_logs").unwrap(), None);
        assert_eq!(store.keys().unwrap(), vec!["blife_orders"]);
    }

    #[test]
    fn test_memory_kv() {
        exercise(&MemoryKv::new());
    }

    #[test]
    fn test_file_kv() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKv::open(dir.path().join("data")).unwrap();
        exercise(&store);
        assert!(store.dir().join("blife_orders.json").exists());
    }

    #[test]
    fn test_file_kv_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        FileKv::open(dir.path()).unwrap().set("blife_users", "[]").unwrap();
        let reopened = FileKv::open(dir.path()).unwrap();
        assert_eq!(reopened.get("blife_users").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let store = MemoryKv::new();
        assert!(matches!(
            store.set("../etc/passwd", "x"),
            Err(StorageError::InvalidKey(_))
        ));
        assert!(matches!(store.get(""), Err(StorageError::InvalidKey(_))));
    }
}
