//! Error types for fetching messages.

use thiserror::Error;

/// Why a message fetch did not produce a list.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Endpoint unreachable, connection dropped, timed out or body unreadable.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Endpoint answered with a non-success status (strict status only).
    #[error("endpoint returned status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly empty.
        body: String,
    },

    /// Body is not a JSON array of message records.
    #[error("malformed response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Configured endpoint is not a valid URL.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),
}

impl FetchError {
    /// Short stable label used in logs and markup.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Network(_) => "network",
            Self::Status { .. } => "status",
            Self::Parse(_) => "parse",
            Self::InvalidEndpoint(_) => "invalid_endpoint",
        }
    }
}

/// Result type alias for fetch operations.
pub type Result<T> = std::result::Result<T, FetchError>;
