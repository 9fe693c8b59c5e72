use crate::domain::errors::{ClientError, ClientResult, APPLICATION_FALLBACK};
use crate::domain::interfaces::HttpTransport;
use crate::domain::models::{
    ActionRequest, ActionResponse, ConnectionConfig, HttpMethod, HttpRequest, Payload,
};
use crate::services::config_repository::ConfigRepository;
use log::{debug, error, info};
use serde_json::Value;
use std::sync::Arc;
use url::Url;

pub const ACTION_PARAM: &str = "action";
pub const DATASET_PARAM: &str = "spreadsheetId";
pub const TEST_CONNECTION_ACTION: &str = "testConnection";

/// Sends actions to the spreadsheet backend and normalizes what comes back.
#[derive(Clone)]
pub struct RemoteDataClient {
    config: ConfigRepository,
    transport: Arc<dyn HttpTransport>,
}

impl RemoteDataClient {
    pub fn new(config: ConfigRepository, transport: Arc<dyn HttpTransport>) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> ConnectionConfig {
        self.config.get_config()
    }

    pub fn set_config(&self, endpoint_url: &str, dataset_id: &str) -> ClientResult<ConnectionConfig> {
        Ok(self.config.set_config(endpoint_url, dataset_id)?)
    }

    pub async fn get(&self, action: &str, payload: Payload) -> ClientResult<ActionResponse> {
        self.perform_action(action, payload, HttpMethod::Get).await
    }

    pub async fn post(&self, action: &str, payload: Payload) -> ClientResult<ActionResponse> {
        self.perform_action(action, payload, HttpMethod::Post).await
    }

    pub async fn perform_action(
        &self,
        action: &str,
        payload: Payload,
        method: HttpMethod,
    ) -> ClientResult<ActionResponse> {
        let request = ActionRequest::new(action)
            .with_payload(payload)
            .with_method(method);
        self.execute(request).await
    }

    pub async fn execute(&self, request: ActionRequest) -> ClientResult<ActionResponse> {
        let config = self.config.get_config();
        if !config.is_configured() {
            error!("{}: endpoint URL is not configured", request.action);
            return Err(ClientError::ConfigurationMissing);
        }

        let http_request = build_request(&config, &request)?;
        info!(
            "Sending {} {} to {}",
            request.method, request.action, http_request.url
        );

        match self.dispatch(http_request).await {
            Ok(response) => {
                info!("{} succeeded", request.action);
                debug!("{} response: {}", request.action, response.0);
                Ok(response)
            }
            Err(e) => {
                error!("{} failed: {}", request.action, e);
                Err(e)
            }
        }
    }

    async fn dispatch(&self, request: HttpRequest) -> ClientResult<ActionResponse> {
        // Send the request
        let response = self.transport.send(request).await?;

        // Reject non-2xx before looking at the body
        if !response.is_success() {
            return Err(ClientError::HttpStatus {
                status: response.status,
                status_text: response.status_text,
            });
        }

        // Parse the text
        let parsed: Value =
            serde_json::from_str(&response.body).map_err(|_| ClientError::malformed(&response.body))?;
        let parsed = ActionResponse(parsed);

        // Application-level error
        if parsed.is_error() {
            let message = parsed
                .message()
                .filter(|message| !message.is_empty())
                .unwrap_or(APPLICATION_FALLBACK);
            return Err(ClientError::Application {
                message: message.to_string(),
            });
        }

        Ok(parsed)
    }

    /// True only for `status: "success"`. Failures come back wrapped.
    pub async fn test_connection(&self) -> ClientResult<bool> {
        self.perform_action(TEST_CONNECTION_ACTION, Payload::new(), HttpMethod::Get)
            .await
            .map(|response| response.is_success())
            .map_err(|e| ClientError::ConnectionTest(Box::new(e)))
    }
}

/// Turns an action into the HTTP request for the configured endpoint.
///
/// `action` and `spreadsheetId` are always present. GET payload entries become
/// query parameters holding the JSON encoding of each value; POST payloads go
/// in a JSON body unless empty.
pub fn build_request(config: &ConnectionConfig, request: &ActionRequest) -> ClientResult<HttpRequest> {
    let mut url = Url::parse(config.endpoint_url.trim()).map_err(|e| ClientError::InvalidEndpoint {
        url: config.endpoint_url.clone(),
        reason: e.to_string(),
    })?;

    // Always-present parameters, then GET payload in the query
    let mut params = vec![
        (ACTION_PARAM.to_string(), request.action.clone()),
        (DATASET_PARAM.to_string(), config.dataset_id.clone()),
    ];
    if request.method == HttpMethod::Get {
        params.extend(
            request
                .payload
                .iter()
                .map(|(key, value)| (key.clone(), value.to_string())),
        );
    }
    set_query_params(&mut url, params);

    // POST payload goes in the body
    let mut headers = Vec::new();
    let mut body = None;
    if request.method == HttpMethod::Post && !request.payload.is_empty() {
        headers.push(("Content-Type".to_string(), "application/json".to_string()));
        body = Some(Value::Object(request.payload.clone()).to_string());
    }

    Ok(HttpRequest {
        method: request.method,
        url,
        headers,
        body,
    })
}

// Each parameter replaces any same-named parameter already on the URL.
fn set_query_params(url: &mut Url, params: Vec<(String, String)>) {
    let mut pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    for (key, value) in params {
        pairs.retain(|(existing, _)| *existing != key);
        pairs.push((key, value));
    }
    url.query_pairs_mut().clear().extend_pairs(&pairs);
}
