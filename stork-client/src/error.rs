//! Error types for the Stork client

use serde::Deserialize;
use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when talking to the workspace API
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed before a response was received
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// API returned a non-success status
    ///
    /// `code` is the structured `error_code` of the response when there is
    /// one, otherwise `http <status>`.
    #[error("{code}: {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Normalized error code
        code: String,
        /// Error message from the API
        message: String,
    },

    /// Failed to parse a successful response
    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

/// The two generations of error payloads the workspace API returns
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error_code: Option<String>,
    message: Option<String>,
    error: Option<String>,
}

impl ClientError {
    /// Create an API error with an explicit code
    pub fn api_error(status: u16, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            code: code.into(),
            message: message.into(),
        }
    }

    /// Normalize an error response body into an API error
    ///
    /// Accepts `{"error_code": ..., "message": ...}`, `{"error": ...}` or
    /// any non-JSON text.
    pub fn from_response_body(status: u16, body: &str) -> Self {
        let http_code = format!("http {}", status);

        match serde_json::from_str::<ErrorBody>(body) {
            Ok(ErrorBody {
                error_code: Some(code),
                message,
                ..
            }) => Self::api_error(status, code, message.unwrap_or_default()),
            Ok(ErrorBody {
                error: Some(error), ..
            }) => Self::api_error(status, http_code, error),
            _ => Self::api_error(status, http_code, body),
        }
    }

    /// Normalized error code, if this is an API error
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::ApiError { code, .. } => Some(code),
            _ => None,
        }
    }

    /// Check if the API rejected a create because the resource already exists
    pub fn is_already_exists(&self) -> bool {
        matches!(
            self,
            Self::ApiError { code, message, .. }
                if code == "RESOURCE_ALREADY_EXISTS" || message.contains("already exists")
        )
    }

    /// Check if this error is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ApiError { status: 404, .. })
            || matches!(self, Self::ApiError { code, .. } if code == "RESOURCE_DOES_NOT_EXIST")
    }

    /// Check if this error is a client error (4xx status)
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::ApiError { status, .. } if *status >= 400 && *status < 500)
    }

    /// Check if this error is a server error (5xx status)
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::ApiError { status, .. } if *status >= 500)
    }
}
