//! Core error types

use thiserror::Error;

/// Result type alias for the dashboard
pub type Result<T> = std::result::Result<T, DashboardError>;

/// Main error type for the dashboard
#[derive(Error, Debug)]
pub enum DashboardError {
    /// Malformed or empty input, caught before any network call
    #[error("Validation error: {0}")]
    Validation(String),

    /// Credentials rejected by the auth backend
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Session no longer valid; forces a local sign-out
    #[error("Session expired: {0}")]
    SessionExpired(String),

    /// Role not authorized for a resource
    #[error("Permission denied: {0}")]
    Permission(String),

    /// Transient transport failure, safe to retry
    #[error("Network error: {0}")]
    Network(String),

    /// Error payload returned by the hosted backend
    #[error("Backend error{}: {message}", code_suffix(.code))]
    Backend {
        /// Machine-readable error code (e.g. `42501`)
        code: Option<String>,
        /// HTTP status, when the error came over HTTP
        status: Option<u16>,
        /// Human-readable message
        message: String,
    },

    /// Resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP client errors
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

fn code_suffix(code: &Option<String>) -> String {
    code.as_deref()
        .map(|c| format!(" [{}]", c))
        .unwrap_or_default()
}
