//! Preference storage backends

use crate::utils::error::Result;
use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Raw persisted values; `None` means never written
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SidebarPreferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sidebar_open: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sidebar_collapsed: Option<bool>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    async fn load(&self) -> Result<SidebarPreferences>;

    async fn save(&self, preferences: &SidebarPreferences) -> Result<()>;
}

/// JSON file store
#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    path: PathBuf,
}

impl FilePreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl PreferenceStore for FilePreferenceStore {
    async fn load(&self) -> Result<SidebarPreferences> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No preferences at {}, using defaults", self.path.display());
                return Ok(SidebarPreferences::default());
            }
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str(&content) {
            Ok(preferences) => Ok(preferences),
            Err(e) => {
                warn!(
                    "Ignoring unreadable preferences at {}: {}",
                    self.path.display(),
                    e
                );
                Ok(SidebarPreferences::default())
            }
        }
    }

    async fn save(&self, preferences: &SidebarPreferences) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let content = serde_json::to_string_pretty(preferences)?;
        tokio::fs::write(&self.path, content).await?;
        Ok(())
    }
}

/// Store that lives as long as the process
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    preferences: RwLock<SidebarPreferences>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_preferences(preferences: SidebarPreferences) -> Self {
        Self {
            preferences: RwLock::new(preferences),
        }
    }

    pub fn snapshot(&self) -> SidebarPreferences {
        *self.preferences.read()
    }
}

#[async_trait]
impl PreferenceStore for MemoryPreferenceStore {
    async fn load(&self) -> Result<SidebarPreferences> {
        Ok(self.snapshot())
    }

    async fn save(&self, preferences: &SidebarPreferences) -> Result<()> {
        *self.preferences.write() = *preferences;
        Ok(())
    }
}
