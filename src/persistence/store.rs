use super::files::{atomic_write, read_file};
use fs2::FileExt;
use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure of the underlying key-value storage
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read storage {path}: {reason}")]
    Read { path: PathBuf, reason: String },
    #[error("storage file {path} is not a JSON object of strings: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode value for key '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write storage {path}: {reason}")]
    Write { path: PathBuf, reason: String },
    #[error("failed to lock storage {path}: {reason}")]
    Lock { path: PathBuf, reason: String },
}

/// New value decided by a read-modify-write
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Update {
    /// Leave the key as it is, nothing is written
    Keep,
    Set(String),
    Remove,
}

/// Synchronous string-keyed storage, the planner's only persistence seam.
///
/// A failed `set`/`remove`/`update` leaves the store at its previous state.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;

    /// Read `key`, let `edit` pick its new value and apply it as one step.
    /// Stores shared between processes hold their lock for the whole call.
    fn update(
        &mut self,
        key: &str,
        edit: &mut dyn FnMut(Option<String>) -> Result<Update, StoreError>,
    ) -> Result<(), StoreError> {
        let current = self.get(key)?;
        match edit(current)? {
            Update::Keep => Ok(()),
            Update::Set(value) => self.set(key, value),
            Update::Remove => self.remove(key),
        }
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }

    fn update(
        &mut self,
        key: &str,
        edit: &mut dyn FnMut(Option<String>) -> Result<Update, StoreError>,
    ) -> Result<(), StoreError> {
        (**self).update(key, edit)
    }
}

/// In-memory store. `fail_writes` simulates a full disk.
#[cfg(test)]
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
    pub fail_writes: bool,
}

#[cfg(test)]
impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::Write {
                path: PathBuf::from("<memory>"),
                reason: "quota exceeded".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.check_writable()?;
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.check_writable()?;
        self.entries.remove(key);
        Ok(())
    }
}

/// Held exclusive lock on the store's lock file, released on drop
struct LockGuard {
    _file: File,
}

/// Store backed by one JSON file holding an object of key -> value strings.
///
/// Every read goes to disk, so changes made by another planner process are
/// seen. Writes lock `<file>.lock`, re-read the file, change the one key
/// and replace the file atomically.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock_path: PathBuf,
}

impl FileStore {
    /// Open the store at `path`. A missing or empty file is an empty store.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let mut lock_name = path.clone().into_os_string();
        lock_name.push(".lock");

        let store = Self {
            path,
            lock_path: PathBuf::from(lock_name),
        };
        let entries = store.load()?;
        log::debug!("Opened storage {} ({} entries)", store.path.display(), entries.len());
        Ok(store)
    }

    fn load(&self) -> Result<BTreeMap<String, String>, StoreError> {
        let content = read_file(&self.path).map_err(|e| StoreError::Read {
            path: self.path.clone(),
            reason: format!("{:#}", e),
        })?;

        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    /// Block until no other process is writing the store
    fn lock(&self) -> Result<LockGuard, StoreError> {
        let lock_error = |e: std::io::Error| StoreError::Lock {
            path: self.lock_path.clone(),
            reason: e.to_string(),
        };
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .open(&self.lock_path)
            .map_err(lock_error)?;
        file.lock_exclusive().map_err(lock_error)?;
        Ok(LockGuard { _file: file })
    }

    fn commit(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(entries).map_err(|source| StoreError::Encode {
            key: "<all>".to_string(),
            source,
        })?;
        atomic_write(&self.path, &json).map_err(|e| StoreError::Write {
            path: self.path.clone(),
            reason: format!("{:#}", e),
        })
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.load()?.remove(key))
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        let mut value = Some(value);
        self.update(key, &mut |_| Ok(value.take().map_or(Update::Keep, Update::Set)))
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.update(key, &mut |_| Ok(Update::Remove))
    }

    fn update(
        &mut self,
        key: &str,
        edit: &mut dyn FnMut(Option<String>) -> Result<Update, StoreError>,
    ) -> Result<(), StoreError> {
        let _lock = self.lock()?;
        let mut entries = self.load()?;

        match edit(entries.get(key).cloned())? {
            Update::Keep => return Ok(()),
            Update::Set(value) => {
                entries.insert(key.to_string(), value);
            }
            Update::Remove => {
                if entries.remove(key).is_none() {
                    return Ok(());
                }
            }
        }
        self.commit(&entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_memory_store_basic() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);

        store.set("k", "v".to_string()).unwrap();
        assert_eq!(store.get("k").unwrap(), Some("v".to_string()));
        assert_eq!(store.len(), 1);

        store.remove("k").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_memory_store_failed_write_keeps_state() {
        let mut store = MemoryStore::new();
        store.set("k", "old".to_string()).unwrap();
        store.fail_writes = true;

        assert!(store.set("k", "new".to_string()).is_err());
        assert!(store.remove("k").is_err());
        assert_eq!(store.get("k").unwrap(), Some("old".to_string()));
    }

    #[test]
    fn test_file_store_persists_across_open() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("storage.json");

        let mut store = FileStore::open(&path).unwrap();
        store.set("Mon Jan 01 2024", "[]".to_string()).unwrap();
        store.set("Tue Jan 02 2024", "[1]".to_string()).unwrap();
        store.remove("Mon Jan 01 2024").unwrap();

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get("Mon Jan 01 2024").unwrap(), None);
        assert_eq!(reopened.get("Tue Jan 02 2024").unwrap(), Some("[1]".to_string()));

        let on_disk: BTreeMap<String, String> =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk.keys().collect::<Vec<_>>(), vec!["Tue Jan 02 2024"]);
    }

    #[test]
    fn test_file_store_missing_file_is_empty() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("none.json");
        let mut store = FileStore::open(&path).unwrap();
        assert_eq!(store.get("k").unwrap(), None);

        // Removing an absent key writes nothing
        store.remove("k").unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_file_store_corrupt_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("storage.json");
        fs::write(&path, "not json").unwrap();

        let err = FileStore::open(&path).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
    }

    #[test]
    fn test_file_store_two_handles_keep_each_others_keys() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("storage.json");

        let mut first = FileStore::open(&path).unwrap();
        let mut second = FileStore::open(&path).unwrap();

        first.set("Mon Jan 01 2024", "A".to_string()).unwrap();
        assert_eq!(second.get("Mon Jan 01 2024").unwrap(), Some("A".to_string()));

        second.set("Tue Jan 02 2024", "B".to_string()).unwrap();
        first.remove("Wed Jan 03 2024").unwrap();

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get("Mon Jan 01 2024").unwrap(), Some("A".to_string()));
        assert_eq!(reopened.get("Tue Jan 02 2024").unwrap(), Some("B".to_string()));
    }

    #[test]
    fn test_file_store_update_sees_latest_value() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("storage.json");

        let mut first = FileStore::open(&path).unwrap();
        let mut second = FileStore::open(&path).unwrap();
        first.set("count", "1".to_string()).unwrap();

        let mut seen = None;
        second
            .update("count", &mut |current| {
                seen = current.clone();
                let next = current.unwrap_or_default().parse::<u32>().unwrap_or(0) + 1;
                Ok(Update::Set(next.to_string()))
            })
            .unwrap();

        assert_eq!(seen, Some("1".to_string()));
        assert_eq!(first.get("count").unwrap(), Some("2".to_string()));
    }

    #[test]
    fn test_file_store_failed_lock_keeps_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("storage.json");

        let mut store = FileStore::open(&path).unwrap();
        store.set("a", "1".to_string()).unwrap();

        // A directory where the lock file goes cannot be opened for writing
        let lock_path = temp_dir.path().join("storage.json.lock");
        fs::remove_file(&lock_path).unwrap();
        fs::create_dir(&lock_path).unwrap();

        let err = store.set("a", "2".to_string()).unwrap_err();
        assert!(matches!(err, StoreError::Lock { .. }));
        assert_eq!(store.get("a").unwrap(), Some("1".to_string()));
    }

    #[test]
    fn test_memory_store_update() {
        let mut store = MemoryStore::new();
        store.update("k", &mut |_| Ok(Update::Set("v".to_string()))).unwrap();
        store.update("k", &mut |_| Ok(Update::Keep)).unwrap();
        assert_eq!(store.get("k").unwrap(), Some("v".to_string()));

        store.update("k", &mut |_| Ok(Update::Remove)).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_boxed_store_delegates() {
        let mut store: Box<dyn KeyValueStore> = Box::new(MemoryStore::new());
        store.set("k", "v".to_string()).unwrap();
        assert_eq!(store.get("k").unwrap(), Some("v".to_string()));
    }
}
