//! Sidebar state

use super::store::{PreferenceStore, SidebarPreferences};
use crate::config::PreferencesConfig;
use crate::utils::error::Result;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::{Mutex as AsyncMutex, watch};
use tracing::debug;

/// Resolved sidebar layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SidebarState {
    pub open: bool,
    pub collapsed: bool,
}

impl SidebarState {
    /// Wide screens get an open, expanded sidebar; narrow ones a closed, collapsed one
    pub fn for_viewport(width: u32, wide_min_width: u32) -> Self {
        let wide = width >= wide_min_width;
        Self {
            open: wide,
            collapsed: !wide,
        }
    }

    fn resolve(preferences: &SidebarPreferences, default: SidebarState) -> Self {
        Self {
            open: preferences.sidebar_open.unwrap_or(default.open),
            collapsed: preferences.sidebar_collapsed.unwrap_or(default.collapsed),
        }
    }
}

/// Observable sidebar state persisted on every change
pub struct Sidebar {
    store: Arc<dyn PreferenceStore>,
    default: SidebarState,
    preferences: Mutex<SidebarPreferences>,
    state: watch::Sender<SidebarState>,
    /// Held across each write so the store ends up with the newest snapshot
    saving: AsyncMutex<()>,
}

impl std::fmt::Debug for Sidebar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sidebar")
            .field("state", &*self.state.borrow())
            .finish()
    }
}

impl Sidebar {
    pub async fn load(
        store: Arc<dyn PreferenceStore>,
        viewport_width: u32,
        config: &PreferencesConfig,
    ) -> Result<Self> {
        let default = SidebarState::for_viewport(viewport_width, config.wide_viewport_min_width);
        let preferences = store.load().await?;
        let state = SidebarState::resolve(&preferences, default);
        debug!("Sidebar loaded: {:?} (viewport {}px)", state, viewport_width);

        let (state, _) = watch::channel(state);
        Ok(Self {
            store,
            default,
            preferences: Mutex::new(preferences),
            state,
            saving: AsyncMutex::new(()),
        })
    }

    pub fn state(&self) -> SidebarState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<SidebarState> {
        self.state.subscribe()
    }

    pub async fn set_open(&self, open: bool) -> Result<()> {
        self.update(|prefs| prefs.sidebar_open = Some(open)).await
    }

    pub async fn toggle_open(&self) -> Result<()> {
        let open = !self.state().open;
        self.set_open(open).await
    }

    pub async fn set_collapsed(&self, collapsed: bool) -> Result<()> {
        self.update(|prefs| prefs.sidebar_collapsed = Some(collapsed))
            .await
    }

    pub async fn toggle_collapsed(&self) -> Result<()> {
        let collapsed = !self.state().collapsed;
        self.set_collapsed(collapsed).await
    }

    async fn update(&self, change: impl FnOnce(&mut SidebarPreferences)) -> Result<()> {
        let snapshot = {
            let mut preferences = self.preferences.lock();
            change(&mut preferences);
            *preferences
        };
        self.state
            .send_replace(SidebarState::resolve(&snapshot, self.default));

        let _saving = self.saving.lock().await;
        // a later change may have landed while waiting for the previous write
        let latest = *self.preferences.lock();
        self.store.save(&latest).await
    }
}
