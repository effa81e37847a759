//! API-specific error types
//!
//! Errors that can occur while talking to the drive server.
//!
//! # Error Types
//!
//! - **`Transport`**: connection, TLS or timeout failures from `reqwest`
//! - **`Status`**: the server answered with a 4xx/5xx status; `body` holds the
//!   response text, which is what the server uses to explain the failure
//! - **`Decode`**: a success response whose JSON did not match the expected shape
//! - **`InvalidUrl`**: the configured server URL cannot be used

use thiserror::Error;

/// API result alias
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Errors returned by `FileApi` implementations
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request could not be sent or its response could not be read
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Server returned an error status
    #[error("{}", status_message(.status, .body))]
    Status { status: u16, body: String },

    /// Response body was not the expected JSON
    #[error("Unexpected response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Server URL is unusable
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// HTTP status, if the server answered at all
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

fn status_message(status: &u16, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        format!("Server returned status {status}")
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_shows_body_text() {
        let error = ApiError::Status {
            status: 400,
            body: "tag id isn't valid\n".to_string(),
        };
        assert_eq!(error.to_string(), "tag id isn't valid");
        assert_eq!(error.status(), Some(400));
    }

    #[test]
    fn test_status_error_without_body() {
        let error = ApiError::Status {
            status: 502,
            body: String::new(),
        };
        assert_eq!(error.to_string(), "Server returned status 502");
    }

    #[test]
    fn test_invalid_url_has_no_status() {
        let error = ApiError::InvalidUrl("ftp://x".to_string());
        assert!(error.status().is_none());
        assert!(error.to_string().contains("ftp://x"));
    }
}
