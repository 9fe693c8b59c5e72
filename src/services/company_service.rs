use crate::domain::errors::{ClientError, ClientResult, StorageError};
use crate::domain::interfaces::KeyValueStore;
use crate::domain::models::{CompanyProfile, Payload};
use crate::services::remote_data_client::RemoteDataClient;
use log::{info, warn};
use serde_json::Value;
use std::sync::Arc;

pub const COMPANY_KEY: &str = "vanda_empresa";
pub const GET_COMPANY_ACTION: &str = "obterEmpresa";
pub const SAVE_COMPANY_ACTION: &str = "salvarEmpresa";

/// Company profile kept in the spreadsheet, with a local copy of the last
/// profile seen.
#[derive(Clone)]
pub struct CompanyService {
    client: RemoteDataClient,
    store: Arc<dyn KeyValueStore>,
}

impl CompanyService {
    pub fn new(client: RemoteDataClient, store: Arc<dyn KeyValueStore>) -> Self {
        Self { client, store }
    }

    pub async fn fetch(&self) -> ClientResult<CompanyProfile> {
        let response = self.client.get(GET_COMPANY_ACTION, Payload::new()).await?;
        let profile = response
            .data()
            .and_then(|data| data.get("empresa"))
            .and_then(Value::as_object)
            .cloned()
            .ok_or_else(|| ClientError::MissingField("data.empresa".to_string()))?;

        self.cache(&profile)?;
        info!("Loaded company profile ({} fields)", profile.len());
        Ok(profile)
    }

    /// The response body is not inspected beyond the usual error checks.
    pub async fn save(&self, profile: CompanyProfile) -> ClientResult<()> {
        self.client.post(SAVE_COMPANY_ACTION, profile.clone()).await?;
        self.cache(&profile)?;
        info!("Saved company profile");
        Ok(())
    }

    pub fn cached(&self) -> Option<CompanyProfile> {
        let raw = match self.store.get_item(COMPANY_KEY) {
            Ok(raw) => raw?,
            Err(e) => {
                warn!("Could not read cached company profile: {}", e);
                return None;
            }
        };
        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(profile)) => Some(profile),
            Ok(_) | Err(_) => {
                warn!("Ignoring corrupt cached company profile");
                None
            }
        }
    }

    fn cache(&self, profile: &CompanyProfile) -> ClientResult<()> {
        let json = serde_json::to_string(profile).map_err(StorageError::from)?;
        self.store.set_item(COMPANY_KEY, &json)?;
        Ok(())
    }
}
