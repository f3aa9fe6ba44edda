//! API Error Types
//!
//! Every failed call to the remote service collapses into an `ApiError`
//! whose `Display` text is what the views show to the user.

use thiserror::Error;

/// Message used when an error body cannot be parsed at all
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Errors that can occur when talking to the remote service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Server answered with a non-success status
    #[error("{message}")]
    Status { status: u16, message: String },

    /// Server could not be reached
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// Request timed out
    #[error("Request timeout")]
    Timeout,

    /// Any other transport failure
    #[error("Request failed: {0}")]
    Request(reqwest::Error),

    /// Success status but the body did not match the expected shape
    #[error("Invalid response: {0}")]
    Decode(String),

    /// Base URL or path could not be turned into a request
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// Build the error for a non-success response from its raw body
    ///
    /// The message is the body's `detail` field when present, `HTTP <status>`
    /// when the body is JSON without one (or with an empty one: `null`, `""`,
    /// `false`, `0`), and [`UNKNOWN_ERROR`] when the body is not JSON.
    pub fn from_status(status: u16, body: &[u8]) -> Self {
        let message = match serde_json::from_slice::<serde_json::Value>(body) {
            Ok(value) => match value.get("detail").filter(|detail| !is_empty_detail(detail)) {
                Some(serde_json::Value::String(detail)) => detail.clone(),
                Some(other) => other.to_string(),
                None => format!("HTTP {}", status),
            },
            Err(_) => UNKNOWN_ERROR.to_string(),
        };

        ApiError::Status { status, message }
    }

    /// HTTP status, when the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ApiError::Timeout
        } else if e.is_connect() {
            ApiError::Unavailable(e.to_string())
        } else if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Request(e)
        }
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

fn is_empty_detail(detail: &serde_json::Value) -> bool {
    match detail {
        serde_json::Value::Null | serde_json::Value::Bool(false) => true,
        serde_json::Value::String(text) => text.is_empty(),
        serde_json::Value::Number(n) => n.as_f64() == Some(0.0),
        _ => false,
    }
}
