//! Error types for the persons API client.
//!
//! # Design
//! Only faults that prevent reading an envelope are errors. A server reply of
//! `success: false` is data, not an error: it is returned as an `Envelope`
//! whatever the HTTP status, so 4xx and 5xx replies are never mapped here.

use thiserror::Error;

/// Errors returned by `PersonClient` operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (unreachable host, reset
    /// connection, unreadable body).
    #[error("transport failed: {0}")]
    Transport(String),

    /// The response body is not a JSON envelope.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

/// Errors raised while resolving the API URL from the environment.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown mode `{0}` (expected `development` or `production`)")]
    UnknownMode(String),

    #[error("invalid port `{0}`")]
    InvalidPort(String),
}
