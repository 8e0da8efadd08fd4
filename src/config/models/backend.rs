//! Hosted backend connection settings

use super::*;
use serde::{Deserialize, Serialize};

/// Hosted backend-as-a-service connection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Project base URL; empty disables the hosted backend
    #[serde(default)]
    pub url: String,
    /// Public (anon) API key sent as `apikey`
    #[serde(default)]
    pub anon_key: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            anon_key: String::new(),
            timeout: default_timeout(),
        }
    }
}

impl BackendConfig {
    pub fn is_configured(&self) -> bool {
        !self.url.is_empty()
    }

    pub fn merge(mut self, other: Self) -> Self {
        if !other.url.is_empty() {
            self.url = other.url;
        }
        if !other.anon_key.is_empty() {
            self.anon_key = other.anon_key;
        }
        if other.timeout != default_timeout() {
            self.timeout = other.timeout;
        }
        self
    }
}
