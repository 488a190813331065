//! Error types for the Linkfix SDK.

use linkfix_domain::LockConflict;
use thiserror::Error;

/// SDK operation errors
#[derive(Debug, Error)]
pub enum SdkError {
    /// The API answered with a non-success status
    #[error("API error (HTTP {status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Message from the response envelope, or the raw body
        message: String,
    },

    /// Connection error (network, DNS, TLS, etc.)
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Authentication or authorization error
    #[error("Authentication error: {0}")]
    AuthError(String),

    /// Response body did not have the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Requested object does not exist
    #[error("Not found: {0}")]
    NotFound(String),
}

/// The API has no dedicated status for lock conflicts; the message is the
/// only signal.
impl LockConflict for SdkError {
    fn is_lock_conflict(&self) -> bool {
        match self {
            SdkError::Api { message, .. } => message.to_lowercase().contains("lock"),
            _ => false,
        }
    }
}

impl From<reqwest::Error> for SdkError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() || e.is_timeout() {
            SdkError::ConnectionError(e.to_string())
        } else if e.is_decode() {
            SdkError::InvalidResponse(e.to_string())
        } else if let Some(status) = e.status() {
            SdkError::Api {
                status: status.as_u16(),
                message: e.to_string(),
            }
        } else {
            SdkError::ConnectionError(e.to_string())
        }
    }
}

impl From<serde_json::Error> for SdkError {
    fn from(e: serde_json::Error) -> Self {
        SdkError::InvalidResponse(format!("JSON parsing error: {}", e))
    }
}
