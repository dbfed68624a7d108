//! Error types for calls against the warm-up API.
//!
//! Every failure is collapsed to "log and continue" by the dashboard, but the
//! kind is kept so callers and tests can tell a dead connection from a
//! rejected request or an unreadable body.

use thiserror::Error;

/// Error returned by a single external call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Transport failure: connect, DNS, reset, etc.
    #[error("network error: {0}")]
    Network(String),
    /// Server answered with a non-2xx status.
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },
    /// Response body could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),
    /// The request address could not be built from the configured base.
    #[error("invalid request address: {0}")]
    InvalidUrl(String),
    /// The request task ended before reporting a result.
    #[error("request aborted before completion")]
    Aborted,
}

/// Discriminant of [`ApiError`], cheap to compare and log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    Network,
    Status,
    Decode,
    InvalidUrl,
    Aborted,
}

impl ApiErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiErrorKind::Network => "network",
            ApiErrorKind::Status => "status",
            ApiErrorKind::Decode => "decode",
            ApiErrorKind::InvalidUrl => "invalid_url",
            ApiErrorKind::Aborted => "aborted",
        }
    }
}

impl ApiError {
    pub fn kind(&self) -> ApiErrorKind {
        match self {
            ApiError::Network(_) => ApiErrorKind::Network,
            ApiError::Status { .. } => ApiErrorKind::Status,
            ApiError::Decode(_) => ApiErrorKind::Decode,
            ApiError::InvalidUrl(_) => ApiErrorKind::InvalidUrl,
            ApiError::Aborted => ApiErrorKind::Aborted,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else if e.is_connect() {
            ApiError::Network(format!("Connection failed: {}", e))
        } else {
            ApiError::Network(format!("Request failed: {}", e))
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}

/// Result type for API calls.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Configuration could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid API base address {value:?}: {reason}")]
    InvalidBase { value: String, reason: String },
}
