use thiserror::Error;
use warp::http::StatusCode;

/// Custom error types for the control panel gateway
#[derive(Debug, Error)]
pub enum PanelError {
    /// Backend transport errors
    #[error("Backend unreachable: {0}")]
    BackendUnreachable(String),

    #[error("Backend request timed out: {0}")]
    BackendTimeout(String),

    #[error("Invalid backend response: {0}")]
    InvalidBackendResponse(String),

    #[error("Backend returned {status}: {body}")]
    BackendRejected { status: u16, body: String },

    /// Browser request errors
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error("{control} is locked while {mode} is active")]
    ControlLocked { control: String, mode: String },

    /// Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigurationParseFailed(String),

    #[error("Failed to serialize message: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    /// Generic errors
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Convenience type alias for Results using PanelError
pub type Result<T> = std::result::Result<T, PanelError>;

impl PanelError {
    /// Helper to create Internal errors with context
    pub fn internal(msg: impl Into<String>) -> Self {
        PanelError::Internal(msg.into())
    }

    /// Helper to create invalid request errors
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        PanelError::InvalidRequest(msg.into())
    }

    /// Helper to create invalid backend response errors
    pub fn invalid_response(msg: impl Into<String>) -> Self {
        PanelError::InvalidBackendResponse(msg.into())
    }

    /// HTTP status reported to the browser for this error.
    ///
    /// Every backend-side failure is a server error; malformed input and
    /// interlocked controls are client errors.
    pub fn status_code(&self) -> StatusCode {
        match self {
            PanelError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            PanelError::UnknownAction(_) => StatusCode::NOT_FOUND,
            PanelError::ControlLocked { .. } => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// JSON body relayed to the browser: `{"error": "..."}`
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({ "error": self.to_string() })
    }
}

/// Convert reqwest::Error to PanelError
impl From<reqwest::Error> for PanelError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            PanelError::BackendTimeout(err.to_string())
        } else if err.is_decode() {
            PanelError::InvalidBackendResponse(err.to_string())
        } else {
            PanelError::BackendUnreachable(err.to_string())
        }
    }
}
