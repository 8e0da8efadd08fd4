//! Common test utilities for storepulse
//!
//! Everything here builds real objects on top of the in-memory backend.

pub mod fixtures;

pub use fixtures::{AccountFixture, AlertFactory, STORE_ID, TestApp};
