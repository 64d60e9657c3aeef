//! Transport-tier errors.
//!
//! Malformed records never surface here; the decoder drops them. Everything in
//! [`ChatError`] is fatal to the request it came from.

use std::time::Duration;

/// Errors from talking to the chat backend.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    // Retryable errors
    /// Network-level error (connection refused, DNS failure, reset).
    #[error("network error: {0}")]
    Network(#[source] Box<dyn std::error::Error + Send + Sync>),
    /// Request timed out.
    #[error("timeout after {0:?}")]
    Timeout(Duration),
    /// The response body stopped before the backend closed it cleanly.
    #[error("stream aborted: {0}")]
    StreamAborted(String),

    // Status errors
    /// The backend answered with a non-success HTTP status.
    #[error("API error: {status}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, as far as it could be read.
        body: String,
    },

    // Terminal errors
    /// A non-streaming response body could not be understood.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    /// Client configuration is invalid.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ChatError {
    /// Whether this error is likely transient and the request can be retried.
    ///
    /// Retry policy itself belongs to the caller.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) | Self::Timeout(_) | Self::StreamAborted(_) => true,
            Self::Status { status, .. } => *status == 429 || (500..=599).contains(status),
            Self::InvalidResponse(_) | Self::Config(_) => false,
        }
    }

    /// The HTTP status, if this error came from one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
