//! Configuration validation
//!
//! This module provides validation logic for all configuration structures.

use super::models::*;
use crate::routing::normalize_path;
use crate::utils::error::{DashboardError, Result};
use std::collections::HashSet;
use tracing::debug;
use url::Url;

/// Hard floor for the password policy; configuration may raise it, never lower it
const MIN_PASSWORD_LENGTH_FLOOR: usize = 6;

/// Validation trait for configuration structures
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

impl Validate for DashboardConfig {
    fn validate(&self) -> Result<()> {
        debug!("Validating dashboard configuration");

        self.backend.validate()?;
        self.auth.validate()?;
        self.polling.validate()?;
        self.preferences.validate()?;
        self.logging.validate()?;
        self.routes.validate()?;

        Ok(())
    }
}

impl Validate for BackendConfig {
    fn validate(&self) -> Result<()> {
        if !self.is_configured() {
            return Ok(());
        }

        let url = Url::parse(&self.url)
            .map_err(|e| DashboardError::Config(format!("Backend URL is invalid: {}", e)))?;

        match url.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(DashboardError::Config(format!(
                    "Backend URL must use http:// or https:// scheme, got: {}",
                    scheme
                )));
            }
        }

        if self.anon_key.is_empty() {
            return Err(DashboardError::Config(
                "Backend anon_key is required when a backend URL is set".to_string(),
            ));
        }

        if self.timeout == 0 || self.timeout > 300 {
            return Err(DashboardError::Config(
                "Backend timeout must be between 1 and 300 seconds".to_string(),
            ));
        }

        Ok(())
    }
}

impl Validate for AuthConfig {
    fn validate(&self) -> Result<()> {
        if self.min_password_length < MIN_PASSWORD_LENGTH_FLOOR {
            return Err(DashboardError::Config(format!(
                "min_password_length must be at least {}",
                MIN_PASSWORD_LENGTH_FLOOR
            )));
        }

        if self.default_password.trim().is_empty() {
            return Err(DashboardError::Config(
                "default_password cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

impl Validate for PollingConfig {
    fn validate(&self) -> Result<()> {
        if self.visible_interval_ms == 0 || self.hidden_interval_ms == 0 {
            return Err(DashboardError::Config(
                "Polling intervals must be greater than 0".to_string(),
            ));
        }

        if self.hidden_interval_ms < self.visible_interval_ms {
            return Err(DashboardError::Config(
                "hidden_interval_ms should not be shorter than visible_interval_ms".to_string(),
            ));
        }

        Ok(())
    }
}

impl Validate for PreferencesConfig {
    fn validate(&self) -> Result<()> {
        if self.wide_viewport_min_width == 0 {
            return Err(DashboardError::Config(
                "wide_viewport_min_width must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl Validate for LoggingConfig {
    fn validate(&self) -> Result<()> {
        if self.level.trim().is_empty() {
            return Err(DashboardError::Config("Log level cannot be empty".to_string()));
        }
        Ok(())
    }
}

impl Validate for RoutesConfig {
    fn validate(&self) -> Result<()> {
        let public = self.public_paths();
        let mut paths = public.to_vec();
        paths.push(self.home_path.as_str());
        for path in paths {
            if !path.starts_with('/') {
                return Err(DashboardError::Config(format!(
                    "Route path must start with '/': {}",
                    path
                )));
            }
        }

        let public: HashSet<String> = public.iter().map(|path| normalize_path(path)).collect();
        let mut seen = HashSet::new();
        for entry in &self.extra {
            if !entry.path.starts_with('/') {
                return Err(DashboardError::Config(format!(
                    "Route path must start with '/': {}",
                    entry.path
                )));
            }
            let path = normalize_path(&entry.path);
            if public.contains(&path) {
                return Err(DashboardError::Config(format!(
                    "Route {} collides with a public path",
                    entry.path
                )));
            }
            if entry.view.is_empty() {
                return Err(DashboardError::Config(format!(
                    "Route {} must name a view",
                    entry.path
                )));
            }
            if !seen.insert(path) {
                return Err(DashboardError::Config(format!(
                    "Duplicate route: {}",
                    entry.path
                )));
            }
        }

        Ok(())
    }
}
