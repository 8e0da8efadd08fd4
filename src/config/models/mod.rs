//! Configuration data models
//!
//! This module defines all configuration structures used throughout the dashboard.

pub mod auth;
pub mod backend;
pub mod dashboard;
pub mod logging;
pub mod polling;
pub mod preferences;
pub mod routes;

pub use auth::*;
pub use backend::*;
pub use dashboard::*;
pub use logging::*;
pub use polling::*;
pub use preferences::*;
pub use routes::*;

/// Default request timeout in seconds
pub fn default_timeout() -> u64 {
    30
}

/// Known default credential assigned on account creation and reset
pub fn default_password() -> String {
    "afeet10".to_string()
}

/// Minimum accepted password length
pub fn default_min_password_length() -> usize {
    6
}

pub fn default_visible_interval_ms() -> u64 {
    30_000
}

pub fn default_hidden_interval_ms() -> u64 {
    120_000
}

/// Viewport width from which the sidebar starts open and expanded
pub fn default_wide_viewport_min_width() -> u32 {
    1024
}

pub fn default_log_level() -> String {
    "info".to_string()
}
