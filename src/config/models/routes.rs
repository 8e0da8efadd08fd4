//! Route table configuration

use crate::auth::rbac::RoleSet;
use serde::{Deserialize, Serialize};

fn default_sign_in_path() -> String {
    "/login".to_string()
}

fn default_reset_password_path() -> String {
    "/reset-password".to_string()
}

fn default_first_access_path() -> String {
    "/first-access".to_string()
}

fn default_home_path() -> String {
    "/".to_string()
}

/// Public paths plus additional protected routes layered over the built-in table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutesConfig {
    #[serde(default = "default_sign_in_path")]
    pub sign_in_path: String,
    #[serde(default = "default_reset_password_path")]
    pub reset_password_path: String,
    #[serde(default = "default_first_access_path")]
    pub first_access_path: String,
    /// Landing path when no return target is remembered
    #[serde(default = "default_home_path")]
    pub home_path: String,
    /// Routes added to (or replacing, by path) the built-in table
    #[serde(default)]
    pub extra: Vec<RouteEntry>,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            sign_in_path: default_sign_in_path(),
            reset_password_path: default_reset_password_path(),
            first_access_path: default_first_access_path(),
            home_path: default_home_path(),
            extra: Vec::new(),
        }
    }
}

/// A protected route declared in configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteEntry {
    pub path: String,
    pub view: String,
    /// Permitted roles; empty admits any authenticated identity
    #[serde(default)]
    pub roles: RoleSet,
    #[serde(default)]
    pub menu_label: Option<String>,
}

impl RoutesConfig {
    pub fn merge(mut self, other: Self) -> Self {
        if other.sign_in_path != default_sign_in_path() {
            self.sign_in_path = other.sign_in_path;
        }
        if other.reset_password_path != default_reset_password_path() {
            self.reset_password_path = other.reset_password_path;
        }
        if other.first_access_path != default_first_access_path() {
            self.first_access_path = other.first_access_path;
        }
        if other.home_path != default_home_path() {
            self.home_path = other.home_path;
        }
        self.extra.extend(other.extra);
        self
    }

    /// Paths that bypass the route guard entirely
    pub fn public_paths(&self) -> [&str; 3] {
        [
            self.sign_in_path.as_str(),
            self.reset_password_path.as_str(),
            self.first_access_path.as_str(),
        ]
    }
}
