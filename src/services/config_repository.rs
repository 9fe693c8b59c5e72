use crate::domain::errors::StorageError;
use crate::domain::interfaces::KeyValueStore;
use crate::domain::models::ConnectionConfig;
use log::{info, warn};
use std::sync::Arc;

pub const CONFIG_KEY: &str = "vanda_gas_config";

/// Owns the persisted connection record. Built once and handed to whatever
/// issues requests.
#[derive(Clone)]
pub struct ConfigRepository {
    store: Arc<dyn KeyValueStore>,
}

impl ConfigRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Stored record merged over empty defaults. Unreadable records count as absent.
    pub fn get_config(&self) -> ConnectionConfig {
        let raw = match self.store.get_item(CONFIG_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return ConnectionConfig::default(),
            Err(e) => {
                warn!("Could not read connection config: {}", e);
                return ConnectionConfig::default();
            }
        };

        ConnectionConfig::from_stored(&raw).unwrap_or_else(|e| {
            warn!("Ignoring corrupt connection config: {}", e);
            ConnectionConfig::default()
        })
    }

    /// Replaces the whole record.
    pub fn set_config(
        &self,
        endpoint_url: &str,
        dataset_id: &str,
    ) -> Result<ConnectionConfig, StorageError> {
        let config = ConnectionConfig::new(endpoint_url, dataset_id);
        let json = serde_json::to_string(&config)?;
        self.store.set_item(CONFIG_KEY, &json)?;
        info!("Connection config updated (dataset '{}')", config.dataset_id);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::file_storage::MemoryStore;

    fn repository() -> (Arc<MemoryStore>, ConfigRepository) {
        let store = Arc::new(MemoryStore::new());
        (store.clone(), ConfigRepository::new(store))
    }

    #[test]
    fn test_empty_store_yields_empty_config() {
        let (_, repo) = repository();
        assert_eq!(repo.get_config(), ConnectionConfig::new("", ""));
    }

    #[test]
    fn test_set_config_overwrites_whole_record() {
        let (store, repo) = repository();
        store
            .set_item(CONFIG_KEY, r#"{"gas_url":"https://old","spreadsheet_id":"old","extra":1}"#)
            .unwrap();

        let saved = repo.set_config("https://x", "id1").unwrap();
        assert_eq!(saved, ConnectionConfig::new("https://x", "id1"));
        assert_eq!(repo.get_config(), ConnectionConfig::new("https://x", "id1"));

        let raw: serde_json::Value =
            serde_json::from_str(&store.get_item(CONFIG_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(
            raw,
            serde_json::json!({"gas_url": "https://x", "spreadsheet_id": "id1"})
        );
    }

    #[test]
    fn test_corrupt_record_falls_back_to_defaults() {
        let (store, repo) = repository();
        store.set_item(CONFIG_KEY, "{not json").unwrap();
        assert_eq!(repo.get_config(), ConnectionConfig::default());
    }

    #[test]
    fn test_missing_field_is_empty_string() {
        let (store, repo) = repository();
        store.set_item(CONFIG_KEY, r#"{"spreadsheet_id":"abc"}"#).unwrap();
        assert_eq!(repo.get_config(), ConnectionConfig::new("", "abc"));
    }
}
