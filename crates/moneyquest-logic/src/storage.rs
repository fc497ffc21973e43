//! Key-value persistence collaborators for the progress store.
//!
//! The store only needs string values under string keys, the same contract a
//! browser's local storage offers. Two implementations ship here:
//! [`MemoryStorage`] for tests and throwaway sessions, and [`FileStorage`],
//! which keeps every key in a single JSON object file.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use thiserror::Error;

/// Keys the game writes.
pub mod storage_keys {
    /// The [`PlayerProgress`](crate::progress::PlayerProgress) record.
    pub const GAME_PROGRESS: &str = "gameProgress";
    /// Date of the last daily bonus claim.
    pub const LAST_DAILY_BONUS: &str = "lastDailyBonus";
}

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage file is not a JSON object of strings: {0}")]
    Json(#[from] serde_json::Error),
}

/// Synchronous string key-value persistence.
pub trait KeyValueStore {
    /// Read the value stored under `key`, if any.
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    fn save(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// In-process storage.
///
/// Clones share the same map, so a clone handed to a second store sees
/// everything the first one wrote. Tests use this to simulate a restart.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Rc<RefCell<BTreeMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// File-backed storage holding all keys in one JSON object.
///
/// The file is read once on open and rewritten in full on every change.
/// Writes go to a sibling temp file which is then renamed over the target,
/// so a crash mid-write leaves the previous contents intact.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    cache: RefCell<BTreeMap<String, String>>,
}

impl FileStorage {
    /// Open storage at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let cache = if path.exists() {
            let data = fs::read_to_string(&path)?;
            if data.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&data)?
            }
        } else {
            BTreeMap::new()
        };
        log::debug!(
            "File storage opened at {} ({} keys)",
            path.display(),
            cache.len()
        );
        Ok(Self {
            path,
            cache: RefCell::new(cache),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling temp file: the full file name plus `.tmp`.
    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn persist(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let data = serde_json::to_string_pretty(&*self.cache.borrow())?;
        let tmp = self.tmp_path();
        fs::write(&tmp, data)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for FileStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.cache.borrow().get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.cache
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self.persist()
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        if self.cache.borrow_mut().remove(key).is_some() {
            self.persist()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_shared_between_clones() {
        let a = MemoryStorage::new();
        let b = a.clone();
        a.save("k", "v").unwrap();
        assert_eq!(b.load("k").unwrap().as_deref(), Some("v"));
        b.remove("k").unwrap();
        assert!(a.is_empty());
    }

    #[test]
    fn test_memory_storage_missing_key() {
        let s = MemoryStorage::new();
        assert_eq!(s.load("nothing").unwrap(), None);
        s.remove("nothing").unwrap();
    }

    #[test]
    fn test_file_storage_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let s = FileStorage::open(dir.path().join("absent.json")).unwrap();
        assert_eq!(s.load(storage_keys::GAME_PROGRESS).unwrap(), None);
    }

    #[test]
    fn test_file_storage_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");
        {
            let s = FileStorage::open(&path).unwrap();
            s.save("a", "1").unwrap();
            s.save("b", "2").unwrap();
            s.remove("a").unwrap();
        }
        let s = FileStorage::open(&path).unwrap();
        assert_eq!(s.load("a").unwrap(), None);
        assert_eq!(s.load("b").unwrap().as_deref(), Some("2"));
        assert!(!dir.path().join("nested").join("storage.json.tmp").exists());
    }

    #[test]
    fn test_file_storage_tmp_suffixed_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("progress.tmp");
        {
            let s = FileStorage::open(&path).unwrap();
            assert_eq!(s.tmp_path(), dir.path().join("progress.tmp.tmp"));
            s.save("k", "v").unwrap();
        }
        assert!(!dir.path().join("progress.tmp.tmp").exists());
        let s = FileStorage::open(&path).unwrap();
        assert_eq!(s.load("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn test_file_storage_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "not json").unwrap();
        assert!(matches!(
            FileStorage::open(&path),
            Err(StorageError::Json(_))
        ));
    }
}
