//! Authentication policy configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Password and credential policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Credential assigned on creation/reset; identities holding it must set a new one
    #[serde(default = "default_password")]
    pub default_password: String,
    /// Minimum length for a new password
    #[serde(default = "default_min_password_length")]
    pub min_password_length: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            default_password: default_password(),
            min_password_length: default_min_password_length(),
        }
    }
}

impl AuthConfig {
    pub fn merge(mut self, other: Self) -> Self {
        if other.default_password != default_password() {
            self.default_password = other.default_password;
        }
        if other.min_password_length != default_min_password_length() {
            self.min_password_length = other.min_password_length;
        }
        self
    }
}
