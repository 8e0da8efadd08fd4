//! Authenticated identity

use super::role::Role;
use serde::{Deserialize, Serialize};

/// The authenticated user record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Backend user id
    pub id: String,
    /// Display username
    pub username: String,
    /// Dashboard role
    pub role: Role,
    /// Owning store, present only for store-scoped roles
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_id: Option<String>,
}

impl Identity {
    pub fn new(id: impl Into<String>, username: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            role,
            store_id: None,
        }
    }

    pub fn with_store(mut self, store_id: impl Into<String>) -> Self {
        self.store_id = Some(store_id.into());
        self
    }

    /// Store this identity's notifications are scoped to, if any
    pub fn alert_scope(&self) -> Option<&str> {
        if self.role.is_store_scoped() {
            self.store_id.as_deref()
        } else {
            None
        }
    }
}
