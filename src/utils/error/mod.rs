//! Error handling for the dashboard access layer
//!
//! This module defines the crate-wide error type and its classification helpers.

mod helpers;
mod types;

pub use types::{DashboardError, Result};
