use crate::domain::errors::{user_message, ClientError};
use crate::domain::models::{
    ActionResponse, CompanyProfile, ConnectionConfig, HttpMethod, Payload, Severity, ThemeColors,
};
use crate::domain::interfaces::{HttpTransport, KeyValueStore, NotificationSurface};
use crate::services::company_service::CompanyService;
use crate::services::config_repository::ConfigRepository;
use crate::services::notifier::TransientNotifier;
use crate::services::remote_data_client::RemoteDataClient;
use crate::services::theme_service::ThemeService;
use std::sync::Arc;

/// Everything a page needs, wired once.
#[derive(Clone)]
pub struct AppState {
    pub config: ConfigRepository,
    pub client: RemoteDataClient,
    pub notifier: TransientNotifier,
    pub company: CompanyService,
    pub theme: ThemeService,
}

impl AppState {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        transport: Arc<dyn HttpTransport>,
        surface: Arc<dyn NotificationSurface>,
    ) -> Self {
        let config = ConfigRepository::new(store.clone());
        let client = RemoteDataClient::new(config.clone(), transport);
        Self {
            company: CompanyService::new(client.clone(), store.clone()),
            theme: ThemeService::new(store),
            notifier: TransientNotifier::new(surface),
            config,
            client,
        }
    }

    fn fail(&self, error: ClientError) -> String {
        self.report(user_message(&error))
    }

    /// Shows a failure message and hands it back for the caller's `Err`.
    pub fn report(&self, message: String) -> String {
        self.notifier.show(message.clone(), Severity::Error);
        message
    }
}

pub fn load_settings(state: &AppState) -> ConnectionConfig {
    state.config.get_config()
}

pub fn save_settings(
    state: &AppState,
    endpoint_url: &str,
    dataset_id: &str,
) -> Result<ConnectionConfig, String> {
    let config = state
        .client
        .set_config(endpoint_url, dataset_id)
        .map_err(|e| state.fail(e))?;
    state.notifier.show("Settings saved", Severity::Success);
    Ok(config)
}

pub async fn test_connection(state: &AppState) -> Result<bool, String> {
    let connected = state.client.test_connection().await.map_err(|e| state.fail(e))?;
    if connected {
        state.notifier.show("Connected to the spreadsheet", Severity::Success);
    } else {
        state
            .notifier
            .show("The server answered but did not confirm the connection", Severity::Warning);
    }
    Ok(connected)
}

pub async fn run_action(
    state: &AppState,
    action: &str,
    payload: Payload,
    method: HttpMethod,
) -> Result<ActionResponse, String> {
    let response = state
        .client
        .perform_action(action, payload, method)
        .await
        .map_err(|e| state.fail(e))?;
    let message = response
        .message()
        .map(str::to_string)
        .unwrap_or_else(|| format!("{} completed", action));
    state.notifier.show(message, Severity::Success);
    Ok(response)
}

pub async fn load_company(state: &AppState) -> Result<CompanyProfile, String> {
    let profile = state.company.fetch().await.map_err(|e| state.fail(e))?;
    state.notifier.show("Company data loaded", Severity::Info);
    Ok(profile)
}

pub async fn save_company(state: &AppState, profile: CompanyProfile) -> Result<(), String> {
    state.company.save(profile).await.map_err(|e| state.fail(e))?;
    state.notifier.show("Company data saved", Severity::Success);
    Ok(())
}

/// Never fails; problems are logged by the theme service.
pub fn load_theme(state: &AppState) -> ThemeColors {
    state.theme.load()
}

pub fn save_theme(state: &AppState, colors: ThemeColors) -> Result<(), String> {
    state
        .theme
        .save(&colors)
        .map_err(|e| state.fail(ClientError::from(e)))?;
    state.notifier.show("Theme saved", Severity::Success);
    Ok(())
}
