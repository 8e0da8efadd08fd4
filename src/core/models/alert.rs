//! Store alerts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A notice published by an administrator to a store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    pub title: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    pub store_id: String,
}

impl Alert {
    /// Expired alerts stay listed until acknowledged, only flagged
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at <= now)
    }
}
