//! Persisted UI preference configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where sidebar preferences live and how defaults are derived
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreferencesConfig {
    /// JSON file backing the preferences; in-memory when unset
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Viewport width (px) from which the sidebar defaults to open and expanded
    #[serde(default = "default_wide_viewport_min_width")]
    pub wide_viewport_min_width: u32,
}

impl Default for PreferencesConfig {
    fn default() -> Self {
        Self {
            path: None,
            wide_viewport_min_width: default_wide_viewport_min_width(),
        }
    }
}

impl PreferencesConfig {
    pub fn merge(mut self, other: Self) -> Self {
        if other.path.is_some() {
            self.path = other.path;
        }
        if other.wide_viewport_min_width != default_wide_viewport_min_width() {
            self.wide_viewport_min_width = other.wide_viewport_min_width;
        }
        self
    }
}
