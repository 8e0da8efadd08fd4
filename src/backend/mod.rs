//! Backend collaborators
//!
//! The dashboard persists nothing itself: authentication and alert storage live in a
//! hosted backend-as-a-service. These traits are the only surface the access layer
//! depends on.

mod hosted;
mod memory;
#[cfg(test)]
mod tests;

pub use hosted::HostedBackend;
pub use memory::{AckFailure, InMemoryBackend};

use crate::core::models::{Alert, Identity};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Result of a successful credential exchange
#[derive(Debug, Clone, PartialEq)]
pub struct AuthGrant {
    pub identity: Identity,
    /// Identity still holds the default credential and must set a new one
    pub first_access: bool,
}

/// Hosted authentication service
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthBackend: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthGrant>;

    async fn sign_out(&self) -> Result<()>;

    /// Reset the account to the default credential
    async fn reset_password(&self, email: &str) -> Result<()>;

    async fn update_password(&self, new_password: &str) -> Result<()>;

    /// Session persisted from an earlier run, if still valid
    async fn current_session(&self) -> Result<Option<AuthGrant>>;
}

/// Hosted alert storage
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AlertBackend: Send + Sync {
    /// Alerts the store has not acknowledged yet
    async fn fetch_unread(&self, store_id: &str) -> Result<Vec<Alert>>;

    async fn acknowledge(&self, alert_id: &str, store_id: &str) -> Result<()>;
}
