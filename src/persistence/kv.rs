use super::files::{atomic_write, read_file};
use crate::error::{PersistError, PersistResult};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// A mapping of named keys to serialized values
pub trait KeyValueStore {
    /// Raw value stored under `key`, `None` if absent
    fn get(&self, key: &str) -> PersistResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&mut self, key: &str, value: &str) -> PersistResult<()>;
}

/// In-process store, nothing survives the process
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store with raw entries
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> PersistResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> PersistResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One `<key>.json` file per key inside a data directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `dir`, creating the directory if needed
    pub fn open<P: AsRef<Path>>(dir: P) -> PersistResult<Self> {
        let dir = dir.as_ref();
        if !dir.exists() {
            fs::create_dir_all(dir).map_err(|e| PersistError::io(dir, e))?;
        }
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`
    pub fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> PersistResult<Option<String>> {
        read_file(self.key_path(key))
    }

    fn set(&mut self, key: &str, value: &str) -> PersistResult<()> {
        atomic_write(self.key_path(key), value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_get_set() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("taskLists").unwrap(), None);

        store.set("taskLists", "[]").unwrap();
        assert_eq!(store.get("taskLists").unwrap().as_deref(), Some("[]"));
        assert_eq!(store.raw("taskLists"), Some("[]"));
    }

    #[test]
    fn test_memory_store_with_entries() {
        let store = MemoryStore::with_entries([("isSidebarOpen", "false")]);
        assert_eq!(store.get("isSidebarOpen").unwrap().as_deref(), Some("false"));
    }

    #[test]
    fn test_file_store_creates_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let data_dir = temp_dir.path().join("nested").join(".tareas");

        let store = FileStore::open(&data_dir).unwrap();

        assert!(data_dir.is_dir());
        assert_eq!(store.dir(), data_dir.as_path());
    }

    #[test]
    fn test_file_store_get_set() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::open(temp_dir.path()).unwrap();

        assert_eq!(store.get("activeListId").unwrap(), None);

        store.set("activeListId", "\"work\"").unwrap();

        assert!(store.key_path("activeListId").ends_with("activeListId.json"));
        assert_eq!(
            store.get("activeListId").unwrap().as_deref(),
            Some("\"work\"")
        );
    }
}
