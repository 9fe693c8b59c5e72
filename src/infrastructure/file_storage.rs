use crate::domain::errors::StorageError;
use crate::domain::interfaces::KeyValueStore;
use log::{debug, warn};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

const STORE_FILE: &str = "storage.json";

/// Key/value strings kept in a single JSON object file.
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Store file under the platform app data directory.
    pub fn default_location() -> Result<Self, StorageError> {
        let app_data_dir = dirs::data_dir()
            .ok_or(StorageError::NoDataDir)?
            .join("Vanda");
        Ok(Self::new(app_data_dir.join(STORE_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StorageError> {
        // Missing file means nothing stored yet
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let json = fs::read_to_string(&self.path)?;
        if json.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&json)?)
    }

    /// Entries to start a write from. A corrupt file is replaced rather than
    /// blocking every later write.
    fn read_for_update(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match self.read_all() {
            Err(StorageError::Serialization(e)) => {
                warn!(
                    "Discarding corrupt store {}: {}",
                    self.path.display(),
                    e
                );
                Ok(BTreeMap::new())
            }
            other => other,
        }
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        // Create directories if they don't exist
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write a sibling file and rename it over the store
        let json = serde_json::to_string_pretty(entries)?;
        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, json)?;
        fs::rename(&temp_path, &self.path)?;

        debug!("Wrote {} entries to {}", entries.len(), self.path.display());
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        Ok(self.read_all()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());

        // Read existing entries
        let mut entries = self.read_for_update()?;

        // Replace the value and write everything back
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut entries = self.read_for_update()?;
        if entries.remove(key).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}

/// In-process store; nothing survives the process.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Ok(entries.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::config_repository::ConfigRepository;
    use crate::domain::models::ConnectionConfig;
    use tempfile::TempDir;

    fn temp_store() -> (TempDir, FileStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("Vanda").join(STORE_FILE));
        (dir, store)
    }

    #[test]
    fn test_missing_file_reads_as_empty() {
        let (_dir, store) = temp_store();
        assert_eq!(store.get_item("anything").unwrap(), None);
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let (_dir, store) = temp_store();
        store.set_item("vanda_gas_config", r#"{"gas_url":"https://x"}"#).unwrap();
        store.set_item("other", "1").unwrap();

        let reopened = FileStore::new(store.path().to_path_buf());
        assert_eq!(
            reopened.get_item("vanda_gas_config").unwrap().as_deref(),
            Some(r#"{"gas_url":"https://x"}"#)
        );

        reopened.remove_item("other").unwrap();
        assert_eq!(store.get_item("other").unwrap(), None);
    }

    #[test]
    fn test_corrupt_file_is_a_read_error() {
        let (_dir, store) = temp_store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "not json").unwrap();

        assert!(matches!(
            store.get_item("key"),
            Err(StorageError::Serialization(_))
        ));
    }

    #[test]
    fn test_truncated_file_can_be_repaired_by_saving_config() {
        let (_dir, store) = temp_store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), r#"{"vanda_gas_config": "{\"gas_url\":\"htt"#).unwrap();

        let repo = ConfigRepository::new(std::sync::Arc::new(FileStore::new(
            store.path().to_path_buf(),
        )));
        assert_eq!(repo.get_config(), ConnectionConfig::default());

        let saved = repo.set_config("https://x", "id1").unwrap();
        assert_eq!(saved, ConnectionConfig::new("https://x", "id1"));
        assert_eq!(repo.get_config(), ConnectionConfig::new("https://x", "id1"));
    }

    #[test]
    fn test_write_leaves_no_temp_file() {
        let (_dir, store) = temp_store();
        store.set_item("k", "v").unwrap();

        let leftovers: Vec<_> = fs::read_dir(store.path().parent().unwrap())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(leftovers, vec![std::ffi::OsString::from(STORE_FILE)]);
    }

    #[test]
    fn test_memory_store_overwrites() {
        let store = MemoryStore::new();
        store.set_item("k", "a").unwrap();
        store.set_item("k", "b").unwrap();
        assert_eq!(store.get_item("k").unwrap().as_deref(), Some("b"));
        store.remove_item("k").unwrap();
        assert_eq!(store.get_item("k").unwrap(), None);
    }
}
