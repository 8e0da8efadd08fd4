//! Integration tests for storepulse
//!
//! These tests drive a full [`AppContext`](storepulse::AppContext) over the
//! in-memory backend, without mocks.

pub mod access_control_tests;
pub mod config_tests;
pub mod notification_tests;
