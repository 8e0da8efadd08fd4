//! Notification polling configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Intervals for the alert liveness poller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    /// Interval while the page is visible, in milliseconds
    #[serde(default = "default_visible_interval_ms")]
    pub visible_interval_ms: u64,
    /// Interval while the page is hidden, in milliseconds
    #[serde(default = "default_hidden_interval_ms")]
    pub hidden_interval_ms: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            visible_interval_ms: default_visible_interval_ms(),
            hidden_interval_ms: default_hidden_interval_ms(),
        }
    }
}

impl PollingConfig {
    pub fn visible_interval(&self) -> Duration {
        Duration::from_millis(self.visible_interval_ms)
    }

    pub fn hidden_interval(&self) -> Duration {
        Duration::from_millis(self.hidden_interval_ms)
    }

    pub fn merge(mut self, other: Self) -> Self {
        if other.visible_interval_ms != default_visible_interval_ms() {
            self.visible_interval_ms = other.visible_interval_ms;
        }
        if other.hidden_interval_ms != default_hidden_interval_ms() {
            self.hidden_interval_ms = other.hidden_interval_ms;
        }
        self
    }
}
