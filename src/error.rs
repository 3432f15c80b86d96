//! Error types for the MMPay SDK.

use thiserror::Error;

/// SDK error type.
///
/// Transport failures, non-2xx responses and undecodable bodies are kept as
/// separate variants so callers can tell them apart.
#[derive(Debug, Error)]
pub enum MmPayError {
    /// Network failure, timeout or connection error from reqwest
    #[cfg(feature = "api")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid request (400)
    #[error("Bad request: {0}")]
    BadRequest(ErrorResponse),

    /// Missing or rejected credentials (401)
    #[error("Unauthorized: {0}")]
    Unauthorized(ErrorResponse),

    /// Permission denied, signature mismatch (403)
    #[error("Permission denied: {0}")]
    Forbidden(ErrorResponse),

    /// Resource not found (404)
    #[error("Not found: {0}")]
    NotFound(ErrorResponse),

    /// Too many requests (429)
    #[error("Rate limited: {0}")]
    RateLimited(ErrorResponse),

    /// Server-side error (5xx)
    #[error("Server error: {0}")]
    ServerError(ErrorResponse),

    /// Any other non-success status
    #[error("Unexpected status {0}: {1}")]
    UnexpectedStatus(u16, ErrorResponse),

    /// Success response whose body is not a JSON object
    #[error("Decode error: {0}")]
    Decode(String),

    /// Payload could not be serialized
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Caller passed invalid or missing input
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Callback signature did not match the payload
    #[error("Invalid callback signature")]
    InvalidSignature,

    /// Missing or empty configuration value
    #[error("Config error: {0}")]
    Config(String),
}

/// Result type alias for SDK operations.
pub type MmPayResult<T> = Result<T, MmPayError>;

/// Error body returned by the API on non-success responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
pub struct ErrorResponse {
    /// Error status (e.g. "error" or "FAILED")
    #[serde(default)]
    pub status: Option<String>,
    /// Human-readable error message
    #[serde(default, alias = "error")]
    pub message: Option<String>,
    /// Additional error details
    #[serde(default)]
    pub details: Option<String>,
}

impl ErrorResponse {
    /// Wrap a raw (non-JSON) body as the error message.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            status: None,
            message: Some(text.into()),
            details: None,
        }
    }

    /// Parse a response body, falling back to the raw text when it is not
    /// the JSON error shape.
    pub fn parse(body: &str) -> Self {
        serde_json::from_str::<ErrorResponse>(body)
            .ok()
            .filter(|r| r.message.is_some() || r.details.is_some())
            .unwrap_or_else(|| Self::from_text(body))
    }

    /// Get the error message, preferring `message` over `details`.
    pub fn get_message(&self) -> String {
        self.message
            .clone()
            .or_else(|| self.details.clone())
            .unwrap_or_else(|| "Unknown error".to_string())
    }
}

impl std::fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.get_message())
    }
}
