//! Error types for the HTTP chat service adapter

use chatsync_application::RemoteError;
use thiserror::Error;

/// Result type alias for HTTP adapter operations
pub type Result<T> = std::result::Result<T, HttpError>;

/// Errors that can occur when talking to the chat service over HTTP
#[derive(Error, Debug)]
pub enum HttpError {
    #[error("Invalid endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP error: {status} {reason}")]
    Status { status: u16, reason: String },

    #[error("Failed to parse response: {error}\nRaw response: {raw}")]
    Decode { error: String, raw: String },
}

impl HttpError {
    pub(crate) fn decode(error: impl ToString, raw: &str) -> Self {
        HttpError::Decode {
            error: error.to_string(),
            raw: raw.to_string(),
        }
    }
}

impl From<HttpError> for RemoteError {
    fn from(error: HttpError) -> Self {
        match error {
            HttpError::Decode { .. } => RemoteError::parse(error.to_string()),
            other => RemoteError::fetch(other.to_string()),
        }
    }
}
