//! Shared utilities
//!
//! - **error**: crate error type and classification helpers
//! - **logging**: tracing subscriber setup

pub mod error;
pub mod logging;

pub use error::{DashboardError, Result};
pub use logging::init_tracing;
