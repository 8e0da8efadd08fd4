//! Input normalization and password policy

use crate::config::AuthConfig;
use crate::utils::error::{DashboardError, Result};
use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid email regex"));

/// Trim and lowercase an email, rejecting empty or malformed input
pub fn normalize_email(email: &str) -> Result<String> {
    let email = email.trim().to_lowercase();

    if email.is_empty() {
        return Err(DashboardError::validation("Email is required"));
    }
    if !EMAIL_PATTERN.is_match(&email) {
        return Err(DashboardError::validation("Invalid email address"));
    }

    Ok(email)
}

/// Rules every new password must satisfy, enforced before any backend call
#[derive(Debug, Clone)]
pub struct PasswordPolicy {
    min_length: usize,
    default_password: String,
}

impl PasswordPolicy {
    pub fn new(min_length: usize, default_password: impl Into<String>) -> Self {
        Self {
            min_length,
            default_password: default_password.into(),
        }
    }

    pub fn min_length(&self) -> usize {
        self.min_length
    }

    pub fn check(&self, password: &str) -> Result<()> {
        if password.chars().count() < self.min_length {
            return Err(DashboardError::validation(format!(
                "Password must be at least {} characters",
                self.min_length
            )));
        }
        if password == self.default_password {
            return Err(DashboardError::validation(
                "New password cannot be the default password",
            ));
        }
        Ok(())
    }
}

impl From<&AuthConfig> for PasswordPolicy {
    fn from(config: &AuthConfig) -> Self {
        Self::new(config.min_password_length, config.default_password.clone())
    }
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self::from(&AuthConfig::default())
    }
}
