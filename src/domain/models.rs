use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use uuid::Uuid;

pub type Payload = Map<String, Value>;

/// Where requests go. Stored as `{"gas_url": ..., "spreadsheet_id": ...}`.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct ConnectionConfig {
    #[serde(rename = "gas_url", default)]
    pub endpoint_url: String,
    #[serde(rename = "spreadsheet_id", default)]
    pub dataset_id: String,
}

impl ConnectionConfig {
    pub fn new(endpoint_url: impl Into<String>, dataset_id: impl Into<String>) -> Self {
        Self {
            endpoint_url: endpoint_url.into(),
            dataset_id: dataset_id.into(),
        }
    }

    /// Reads a stored record, taking each field only when it is a string.
    /// Missing or non-string fields keep the empty default.
    pub fn from_stored(raw: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(raw)?;
        let field = |name: &str| {
            value
                .get(name)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        Ok(Self {
            endpoint_url: field("gas_url"),
            dataset_id: field("spreadsheet_id"),
        })
    }

    pub fn is_configured(&self) -> bool {
        !self.endpoint_url.trim().is_empty()
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ActionRequest {
    pub action: String,
    pub payload: Payload,
    pub method: HttpMethod,
}

impl ActionRequest {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            payload: Payload::new(),
            method: HttpMethod::Get,
        }
    }

    pub fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = payload;
        self
    }

    pub fn with_method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }
}

pub const STATUS_SUCCESS: &str = "success";
pub const STATUS_ERROR: &str = "error";

/// Decoded response body. Handed back to callers exactly as parsed.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(transparent)]
pub struct ActionResponse(pub Value);

impl ActionResponse {
    pub fn status(&self) -> Option<&str> {
        self.0.get("status").and_then(Value::as_str)
    }

    pub fn is_success(&self) -> bool {
        self.status() == Some(STATUS_SUCCESS)
    }

    pub fn is_error(&self) -> bool {
        self.status() == Some(STATUS_ERROR)
    }

    pub fn message(&self) -> Option<&str> {
        self.0.get("message").and_then(Value::as_str)
    }

    pub fn data(&self) -> Option<&Value> {
        self.0.get("data")
    }

    pub fn into_inner(self) -> Value {
        self.0
    }
}

/// Outbound request as handed to a transport.
#[derive(Clone, Debug, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: url::Url,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Raw response; the body is kept as text so unparsable output can be reported.
#[derive(Clone, Debug, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
    Warning,
    #[default]
    Info,
}

impl Severity {
    pub fn color(&self) -> &'static str {
        match self {
            Severity::Success => "#28a745",
            Severity::Error => "#dc3545",
            Severity::Warning => "#ffc107",
            Severity::Info => "#17a2b8",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

// Unknown names fall back to info rather than failing.
impl From<&str> for Severity {
    fn from(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "success" => Severity::Success,
            "error" => Severity::Error,
            "warning" => Severity::Warning,
            _ => Severity::Info,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct NotificationRequest {
    pub message: String,
    #[serde(default)]
    pub severity: Severity,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Notification {
    pub id: Uuid,
    pub message: String,
    pub severity: Severity,
    pub color: String,
    pub shown_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(request: NotificationRequest) -> Self {
        Self {
            id: Uuid::new_v4(),
            color: request.severity.color().to_string(),
            message: request.message,
            severity: request.severity,
            shown_at: Utc::now(),
        }
    }
}

pub type CompanyProfile = Map<String, Value>;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct ThemeColors {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            primary: "#2c3e50".to_string(),
            secondary: "#34495e".to_string(),
            accent: "#17a2b8".to_string(),
        }
    }
}
