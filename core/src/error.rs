//! Error types for the FBX4VRM client.
//!
//! # Design
//! The `Display` text of each `ApiError` variant is exactly the message a
//! caller sees on the error path (and what the callback adapter hands to
//! `on_error`). Connection failures and HTTP status failures are separate
//! variants, but the envelope exposes them only through that message.

use thiserror::Error;

/// Errors carried by a failed [`ApiResponse`](crate::envelope::ApiResponse).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// DNS, TCP, TLS or timeout failure before a response was received.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The server answered with a non-2xx status.
    #[error("HTTP error {status}: {detail}")]
    Http { status: u16, detail: String },

    /// The response body could not be deserialized into the expected type.
    /// The serde message is kept for logs; the raw body lives on the envelope.
    #[error("Failed to parse response JSON")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("Failed to serialize request JSON: {0}")]
    Serialization(String),

    /// The request succeeded but the server declined it (business status).
    #[error("{0}")]
    Rejected(String),

    /// The HTTP client could not be constructed from the configuration.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),
}

/// A failure to obtain any HTTP response from the server.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        ApiError::Connection(err.message)
    }
}

/// Invalid values in environment-provided configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{var} must be a non-negative integer number of seconds, got {value:?}")]
    InvalidTimeout { var: &'static str, value: String },

    #[error("{var} must be a boolean (true/false/1/0), got {value:?}")]
    InvalidFlag { var: &'static str, value: String },
}
