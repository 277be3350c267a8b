//! Error types for Datachat
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for Datachat operations
///
/// This enum encompasses all possible errors that can occur during
/// configuration loading, backend calls, and progress channel handling.
///
/// Chart derivation deliberately has no error variant: a descriptor that
/// cannot be turned into a chart is omitted, never surfaced as a failure.
#[derive(Error, Debug)]
pub enum DatachatError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Analysis backend returned a non-success status
    #[error("Backend error ({status}): {message}")]
    Backend {
        /// HTTP status code returned by the backend
        status: u16,
        /// Response body or error description
        message: String,
    },

    /// Progress channel errors (connection, stream interruption)
    #[error("Progress channel error: {0}")]
    Channel(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for Datachat operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;
