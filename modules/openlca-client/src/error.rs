use thiserror::Error;

pub type Result<T> = std::result::Result<T, OpenLcaError>;

#[derive(Debug, Error)]
pub enum OpenLcaError {
    #[error("OpenLCA unreachable: {0}")]
    Unreachable(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Malformed upstream response: {0}")]
    MalformedResponse(String),

    #[error("Invalid request: {0}")]
    Request(String),
}

impl OpenLcaError {
    /// True when the engine could not be reached at all (connection refused, timeout).
    pub fn is_unreachable(&self) -> bool {
        matches!(self, OpenLcaError::Unreachable(_))
    }

    /// True for failures that originate on our side, before anything reached the engine.
    pub fn is_request(&self) -> bool {
        matches!(self, OpenLcaError::Request(_))
    }
}

impl From<reqwest::Error> for OpenLcaError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            OpenLcaError::Request(err.to_string())
        } else if err.is_connect() || err.is_timeout() {
            OpenLcaError::Unreachable(err.to_string())
        } else if err.is_decode() {
            OpenLcaError::MalformedResponse(err.to_string())
        } else {
            OpenLcaError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for OpenLcaError {
    fn from(err: serde_json::Error) -> Self {
        OpenLcaError::MalformedResponse(err.to_string())
    }
}
