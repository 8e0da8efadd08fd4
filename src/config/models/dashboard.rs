//! Top-level dashboard configuration

use super::*;
use crate::utils::error::{DashboardError, Result};
use serde::{Deserialize, Serialize};
use std::env;

/// Main dashboard configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DashboardConfig {
    /// Hosted backend connection
    #[serde(default)]
    pub backend: BackendConfig,
    /// Authentication policy
    #[serde(default)]
    pub auth: AuthConfig,
    /// Notification polling
    #[serde(default)]
    pub polling: PollingConfig,
    /// Persisted UI preferences
    #[serde(default)]
    pub preferences: PreferencesConfig,
    /// Logging
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Route table
    #[serde(default)]
    pub routes: RoutesConfig,
}

impl DashboardConfig {
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(url) = env::var("STOREPULSE_BACKEND_URL") {
            config.backend.url = url;
        }
        if let Ok(key) = env::var("STOREPULSE_ANON_KEY") {
            config.backend.anon_key = key;
        }
        if let Ok(timeout) = env::var("STOREPULSE_TIMEOUT_SECS") {
            config.backend.timeout = timeout.parse().map_err(|_| {
                DashboardError::Config(format!("Invalid STOREPULSE_TIMEOUT_SECS: {}", timeout))
            })?;
        }
        if let Ok(level) = env::var("STOREPULSE_LOG_LEVEL") {
            config.logging.level = level;
        }
        if let Ok(path) = env::var("STOREPULSE_PREFERENCES_PATH") {
            config.preferences.path = Some(path.into());
        }

        Ok(config)
    }

    /// Merge two configurations, with other taking precedence
    pub fn merge(mut self, other: Self) -> Self {
        self.backend = self.backend.merge(other.backend);
        self.auth = self.auth.merge(other.auth);
        self.polling = self.polling.merge(other.polling);
        self.preferences = self.preferences.merge(other.preferences);
        self.logging = self.logging.merge(other.logging);
        self.routes = self.routes.merge(other.routes);
        self
    }
}
