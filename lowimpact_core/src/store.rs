//! String-keyed persistence boundary.
//!
//! The progress tracker only ever needs `get` and `set` over a handful of
//! keys. `FileStore` keeps them in a single JSON object on disk with file
//! locking and atomic replacement; `MemoryStore` keeps them in a map.

use crate::{Error, Result};
use fs2::FileExt;
use serde_json::Value;
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Opaque string-keyed get/set store
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// In-memory store, mostly for tests and embedding
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-populated with the given pairs
    pub fn with_values<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: values
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// JSON object file store with file locking
///
/// Updates hold an exclusive lock on a sidecar `<file>.lock` for the whole
/// read-modify-write, so concurrent writers never drop each other's keys.
#[derive(Clone, Debug)]
pub struct FileStore {
    path: PathBuf,
}

type JsonMap = serde_json::Map<String, Value>;

impl FileStore {
    /// Create a store backed by the file at `path`. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parent_dir(&self) -> &Path {
        self.path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
    }

    fn lock_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".lock");
        self.path.with_file_name(name)
    }

    /// Read the whole object with a shared lock.
    ///
    /// Returns an empty map if the file doesn't exist.
    /// If the file is not a JSON object, logs a warning and returns an empty map.
    fn read_map(&self) -> Result<JsonMap> {
        if !self.path.exists() {
            tracing::debug!("No store file at {:?}, treating as empty", self.path);
            return Ok(JsonMap::new());
        }

        let file = File::open(&self.path)?;
        file.lock_shared()?;

        let mut contents = String::new();
        let read = std::io::BufReader::new(&file).read_to_string(&mut contents);
        file.unlock()?;
        read?;

        match serde_json::from_str::<JsonMap>(&contents) {
            Ok(map) => {
                tracing::debug!("Loaded {} keys from {:?}", map.len(), self.path);
                Ok(map)
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to parse store file {:?}: {}. Treating as empty.",
                    self.path,
                    e
                );
                Ok(JsonMap::new())
            }
        }
    }

    /// Atomically replace the file by writing a temp file and renaming it over the original.
    fn write_map(&self, map: &JsonMap) -> Result<()> {
        let temp = NamedTempFile::new_in(self.parent_dir())?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string(map)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;

        temp.persist(&self.path).map_err(|e| {
            Error::Store(format!("Failed to replace {:?}: {}", self.path, e.error))
        })?;

        tracing::debug!("Saved store file {:?}", self.path);
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    /// A value that is not a JSON string is reported as malformed for its key only.
    fn get(&self, key: &str) -> Result<Option<String>> {
        match self.read_map()?.remove(key) {
            None => Ok(None),
            Some(Value::String(value)) => Ok(Some(value)),
            Some(other) => Err(Error::Parse {
                key: key.to_string(),
                value: other.to_string(),
            }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        std::fs::create_dir_all(self.parent_dir())?;

        let lock = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.lock_path())?;
        lock.lock_exclusive()?;

        let result = self.read_map().and_then(|mut map| {
            map.insert(key.to_string(), Value::String(value.to_string()));
            self.write_map(&map)
        });

        lock.unlock()?;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_get_set() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("level").unwrap(), None);
        store.set("level", "3").unwrap();
        assert_eq!(store.get("level").unwrap(), Some("3".into()));
    }

    #[test]
    fn test_memory_store_with_values() {
        let store = MemoryStore::with_values([("streak", "4"), ("last_done", "19000")]);
        assert_eq!(store.get("streak").unwrap(), Some("4".into()));
        assert_eq!(store.get("last_done").unwrap(), Some("19000".into()));
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("progress.json");

        let mut store = FileStore::new(&path);
        store.set("level", "2").unwrap();
        store.set("streak", "5").unwrap();

        let reopened = FileStore::new(&path);
        assert_eq!(reopened.get("level").unwrap(), Some("2".into()));
        assert_eq!(reopened.get("streak").unwrap(), Some("5".into()));
        assert_eq!(reopened.get("last_done").unwrap(), None);
    }

    #[test]
    fn test_file_store_missing_file_is_empty() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(temp_dir.path().join("nonexistent.json"));
        assert_eq!(store.get("level").unwrap(), None);
    }

    #[test]
    fn test_file_store_corrupted_file_is_empty() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("progress.json");
        std::fs::write(&path, "{ invalid json }").unwrap();

        let mut store = FileStore::new(&path);
        assert_eq!(store.get("level").unwrap(), None);

        // A write replaces the corrupted file with a valid one
        store.set("level", "4").unwrap();
        assert_eq!(store.get("level").unwrap(), Some("4".into()));
    }

    #[test]
    fn test_file_store_wrong_type_affects_only_that_key() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("progress.json");
        std::fs::write(&path, r#"{"level":"4","streak":6,"last_done":"99"}"#).unwrap();

        let mut store = FileStore::new(&path);
        assert_eq!(store.get("level").unwrap(), Some("4".into()));
        assert_eq!(store.get("last_done").unwrap(), Some("99".into()));
        assert!(matches!(
            store.get("streak"),
            Err(Error::Parse { ref key, ref value }) if key == "streak" && value == "6"
        ));

        // Writing another key keeps the valid ones on disk
        store.set("streak", "0").unwrap();
        let reopened = FileStore::new(&path);
        assert_eq!(reopened.get("level").unwrap(), Some("4".into()));
        assert_eq!(reopened.get("streak").unwrap(), Some("0".into()));
        assert_eq!(reopened.get("last_done").unwrap(), Some("99".into()));
    }

    #[test]
    fn test_concurrent_writers_keep_every_key() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("progress.json");

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let path = path.clone();
                std::thread::spawn(move || {
                    let mut store = FileStore::new(path);
                    store.set(&format!("key_{}", i), &i.to_string()).unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let store = FileStore::new(&path);
        for i in 0..8 {
            assert_eq!(store.get(&format!("key_{}", i)).unwrap(), Some(i.to_string()));
        }
    }

    #[test]
    fn test_file_store_creates_parent_dirs() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("dir").join("progress.json");

        let mut store = FileStore::new(&path);
        store.set("streak", "1").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_atomic_write_leaves_no_temp_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("progress.json");

        let mut store = FileStore::new(&path);
        store.set("level", "1").unwrap();
        store.set("streak", "0").unwrap();

        let extras: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| {
                let name = e.file_name();
                name != "progress.json" && name != "progress.json.lock"
            })
            .collect();
        assert!(
            extras.is_empty(),
            "Expected only progress.json and its lock, found extras: {:?}",
            extras
        );
    }

    #[test]
    fn test_file_format_is_string_map() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("progress.json");

        let mut store = FileStore::new(&path);
        store.set("last_done", "20000").unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed["last_done"], "20000");
    }
}
