use thiserror::Error;

/// Longest excerpt of an unparsable body kept in an error.
pub const EXCERPT_CHARS: usize = 100;

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Could not determine app data directory")]
    NoDataDir,

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to (de)serialize stored data: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// What a transport reports when no HTTP response was obtained.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportFailure {
    #[error("Network error: {0}")]
    Network(String),

    #[error("CORS error: {0}")]
    Cors(String),

    #[error("{0}")]
    Other(String),
}

const NETWORK_PHRASES: &[&str] = &[
    "failed to fetch",
    "networkerror",
    "network request failed",
    "network error",
    "connection refused",
    "dns error",
];

const CORS_PHRASES: &[&str] = &["cors", "cross-origin"];

impl TransportFailure {
    /// Sorts a raw failure message by the phrases runtimes use for
    /// connectivity and cross-origin failures.
    pub fn classify(message: impl Into<String>) -> Self {
        let message = message.into();
        let lowered = message.to_lowercase();
        if CORS_PHRASES.iter().any(|phrase| lowered.contains(phrase)) {
            TransportFailure::Cors(message)
        } else if NETWORK_PHRASES.iter().any(|phrase| lowered.contains(phrase)) {
            TransportFailure::Network(message)
        } else {
            TransportFailure::Other(message)
        }
    }
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Endpoint URL is not configured")]
    ConfigurationMissing,

    #[error("Invalid endpoint URL '{url}': {reason}")]
    InvalidEndpoint { url: String, reason: String },

    #[error("HTTP error {status}: {status_text}")]
    HttpStatus { status: u16, status_text: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("CORS error: {0}")]
    Cors(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid response: {excerpt}")]
    MalformedResponse { excerpt: String },

    #[error("{message}")]
    Application { message: String },

    #[error("Response is missing '{0}'")]
    MissingField(String),

    #[error("Connection test failed: {0}")]
    ConnectionTest(Box<ClientError>),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<TransportFailure> for ClientError {
    fn from(failure: TransportFailure) -> Self {
        match failure {
            TransportFailure::Network(cause) => ClientError::Network(cause),
            TransportFailure::Cors(cause) => ClientError::Cors(cause),
            TransportFailure::Other(cause) => ClientError::Transport(cause),
        }
    }
}

impl ClientError {
    pub fn malformed(body: &str) -> Self {
        ClientError::MalformedResponse {
            excerpt: body.chars().take(EXCERPT_CHARS).collect(),
        }
    }
}

/// Why the `vanda` binary stopped.
#[derive(Error, Debug)]
pub enum RunError {
    /// Failed before anything could be shown to the user.
    #[error("{0}")]
    Setup(String),

    /// The command failed and its message was already shown.
    #[error("{0}")]
    Reported(String),
}

pub const NETWORK_MESSAGE: &str =
    "Could not reach the server. Check your internet connection and try again.";
pub const CORS_MESSAGE: &str =
    "The server refused the request for security reasons. Check the endpoint deployment settings.";
pub const APPLICATION_FALLBACK: &str = "The server reported an error without details";

/// Text shown to the user for an error.
pub fn user_message(error: &ClientError) -> String {
    match error {
        ClientError::ConfigurationMissing => {
            "Endpoint URL is not configured. Open the settings and enter it.".to_string()
        }
        ClientError::Network(_) => NETWORK_MESSAGE.to_string(),
        ClientError::Cors(_) => CORS_MESSAGE.to_string(),
        ClientError::ConnectionTest(inner) => {
            format!("Connection test failed: {}", user_message(inner))
        }
        other => format!("Request failed: {}", other),
    }
}
