//! Key-value storage slots backing the cart.
//!
//! The widget never touches an ambient global store; it is handed a
//! [`Storage`] implementation at construction time. Two backends ship here:
//!
//! - [`MemoryStorage`] - a `HashMap`, optionally with a byte quota like a
//!   browser's local storage
//! - [`FileStorage`] - one file per key under a directory, replaced by rename
//!   so readers never observe a partial value

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors raised by storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Keys must be non-empty and limited to `[A-Za-z0-9._-]`.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    /// Writing the value would exceed the backend's quota.
    #[error("storage quota exceeded: {needed} bytes needed, {limit} allowed")]
    QuotaExceeded { needed: usize, limit: usize },

    /// Filesystem operation failed.
    #[error("storage I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The value could not be serialised.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A string-keyed slot store.
pub trait Storage {
    /// Read a slot. Missing and unreadable slots both return `None`.
    fn get(&self, key: &str) -> Option<String>;

    /// Overwrite a slot.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the write.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a slot. Deleting a missing slot succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to delete an existing slot.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        && !key.starts_with('.');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

// =============================================================================
// Memory
// =============================================================================

/// In-memory storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slots: HashMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage that rejects writes once the total size of keys and values
    /// would exceed `bytes`.
    #[must_use]
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            slots: HashMap::new(),
            quota: Some(bytes),
        }
    }

    fn used_without(&self, key: &str) -> usize {
        self.slots
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.slots.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Some(limit) = self.quota {
            let needed = self.used_without(key) + key.len() + value.len();
            if needed > limit {
                return Err(StorageError::QuotaExceeded { needed, limit });
            }
        }
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.slots.remove(key);
        Ok(())
    }
}

// =============================================================================
// File
// =============================================================================

/// Directory-backed storage: slot `key` lives in `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Open (and create if needed) a storage directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| StorageError::Io {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn slot_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        validate_key(key).ok()?;
        let path = self.slot_path(key);
        match fs::read_to_string(&path) {
            Ok(value) => Some(value),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read storage slot");
                None
            }
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        let path = self.slot_path(key);
        let tmp = self.dir.join(format!(".{key}.json.tmp"));

        fs::write(&tmp, value).map_err(|source| StorageError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &path).map_err(|source| StorageError::Io { path, source })
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        let path = self.slot_path(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_memory_round_trip() {
        let mut storage = MemoryStorage::new();
        assert_eq!(storage.get("cart"), None);

        storage.set("cart", "[]").unwrap();
        assert_eq!(storage.get("cart").as_deref(), Some("[]"));

        storage.remove("cart").unwrap();
        assert_eq!(storage.get("cart"), None);
    }

    #[test]
    fn test_memory_quota() {
        let mut storage = MemoryStorage::with_quota(10);
        storage.set("k", "12345").unwrap();
        // Overwriting the same key does not count the old value.
        storage.set("k", "123456789").unwrap();

        let err = storage.set("k", "1234567890").unwrap_err();
        assert!(matches!(
            err,
            StorageError::QuotaExceeded { needed: 11, limit: 10 }
        ));
        assert_eq!(storage.get("k").as_deref(), Some("123456789"));
    }

    #[test]
    fn test_file_round_trip() {
        let dir = TempDir::new().unwrap();
        let mut storage = FileStorage::open(dir.path().join("nested")).unwrap();

        assert_eq!(storage.get("wineStoreCart"), None);
        storage.set("wineStoreCart", "[1]").unwrap();
        storage.set("wineStoreCart", "[2]").unwrap();
        assert_eq!(storage.get("wineStoreCart").as_deref(), Some("[2]"));
        assert!(dir.path().join("nested/wineStoreCart.json").exists());
        assert!(!dir.path().join("nested/.wineStoreCart.json.tmp").exists());

        storage.remove("wineStoreCart").unwrap();
        storage.remove("wineStoreCart").unwrap();
        assert_eq!(storage.get("wineStoreCart"), None);
    }

    #[test]
    fn test_file_rejects_path_keys() {
        let dir = TempDir::new().unwrap();
        let mut storage = FileStorage::open(dir.path()).unwrap();

        assert!(matches!(
            storage.set("../escape", "x"),
            Err(StorageError::InvalidKey(_))
        ));
        assert!(matches!(storage.set("", "x"), Err(StorageError::InvalidKey(_))));
        assert!(matches!(storage.set(".hidden", "x"), Err(StorageError::InvalidKey(_))));
        assert_eq!(storage.get("../escape"), None);
    }
}
