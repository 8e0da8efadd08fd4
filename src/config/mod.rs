//! Configuration management for the dashboard
//!
//! This module handles loading, validation, and merging of all dashboard configuration.

pub mod models;
pub mod validation;

pub use models::*;
pub use validation::Validate;

use crate::utils::error::{DashboardError, Result};
use std::path::Path;
use tracing::{debug, info};

/// Main configuration struct
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Dashboard configuration
    pub dashboard: DashboardConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| DashboardError::Config(format!("Failed to read config file: {}", e)))?;

        let dashboard: DashboardConfig = serde_yaml::from_str(&content)
            .map_err(|e| DashboardError::Config(format!("Failed to parse config: {}", e)))?;

        let config = Self { dashboard };
        config.validate()?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Load configuration from `STOREPULSE_*` environment variables (and `.env`)
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let _ = dotenvy::dotenv();
        let dashboard = DashboardConfig::from_env()?;
        let config = Self { dashboard };

        config.validate()?;
        Ok(config)
    }

    pub fn backend(&self) -> &BackendConfig {
        &self.dashboard.backend
    }

    pub fn auth(&self) -> &AuthConfig {
        &self.dashboard.auth
    }

    pub fn polling(&self) -> &PollingConfig {
        &self.dashboard.polling
    }

    pub fn preferences(&self) -> &PreferencesConfig {
        &self.dashboard.preferences
    }

    pub fn logging(&self) -> &LoggingConfig {
        &self.dashboard.logging
    }

    pub fn routes(&self) -> &RoutesConfig {
        &self.dashboard.routes
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");
        self.dashboard.validate()?;
        debug!("Configuration validation completed");
        Ok(())
    }

    /// Merge with another configuration (other takes precedence)
    pub fn merge(mut self, other: Self) -> Self {
        self.dashboard = self.dashboard.merge(other.dashboard);
        self
    }

    /// Convert to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(&self.dashboard)
            .map_err(|e| DashboardError::Config(format!("Failed to serialize config to YAML: {}", e)))
    }
}
