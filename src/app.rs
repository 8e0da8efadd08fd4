//! Application context
//!
//! Owns every long-lived piece of the access layer: session, guard, sidebar,
//! page environment and the alert inbox of the signed-in store. Hosts build
//! one [`AppContext`] and pass it around by reference.

use crate::auth::session::{PasswordPolicy, SessionExpirySignal, SessionState, SessionStore};
use crate::backend::{AlertBackend, AuthBackend, HostedBackend};
use crate::config::Config;
use crate::core::models::Identity;
use crate::notifications::{AlertInbox, LivenessPoller, PageEnvironment, PollerHandle};
use crate::preferences::{FilePreferenceStore, MemoryPreferenceStore, PreferenceStore, Sidebar};
use crate::routing::{GuardedView, RouteGuard, RouteTable};
use crate::utils::error::Result;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

struct InboxBinding {
    inbox: Arc<AlertInbox>,
    _poller: PollerHandle,
}

/// The inbox follows the identity: attached for store-scoped identities,
/// dropped (poller included) as soon as the identity goes away.
struct InboxSlot {
    alerts: Arc<dyn AlertBackend>,
    expiry: SessionExpirySignal,
    poller: LivenessPoller,
    environment: Arc<PageEnvironment>,
    current: Mutex<Option<InboxBinding>>,
}

impl InboxSlot {
    /// Returns the inbox when a new one was attached; it still needs a first refresh
    fn sync(&self, identity: Option<&Identity>) -> Option<Arc<AlertInbox>> {
        let scope = identity.and_then(Identity::alert_scope);
        let mut current = self.current.lock();

        if current.as_ref().map(|binding| binding.inbox.store_id()) == scope {
            return None;
        }
        if let Some(previous) = current.take() {
            debug!("Detaching alert inbox for store {}", previous.inbox.store_id());
        }

        let store_id = scope?;
        let inbox = Arc::new(AlertInbox::new(
            self.alerts.clone(),
            store_id,
            self.expiry.clone(),
        ));
        let poller = inbox.spawn_poller(&self.poller, &self.environment);
        info!("Attached alert inbox for store {}", store_id);
        *current = Some(InboxBinding {
            inbox: inbox.clone(),
            _poller: poller,
        });
        Some(inbox)
    }

    fn inbox(&self) -> Option<Arc<AlertInbox>> {
        self.current.lock().as_ref().map(|binding| binding.inbox.clone())
    }
}

async fn first_refresh(inbox: Arc<AlertInbox>) {
    if let Err(e) = inbox.refresh().await {
        warn!("Initial alert refresh failed: {}", e);
    }
}

pub struct AppContext {
    config: Config,
    session: Arc<SessionStore>,
    guard: Arc<RouteGuard>,
    sidebar: Sidebar,
    environment: Arc<PageEnvironment>,
    inbox: Arc<InboxSlot>,
    tasks: Vec<JoinHandle<()>>,
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("session", &self.session)
            .field("sidebar", &self.sidebar)
            .finish()
    }
}

impl AppContext {
    /// Context talking to the configured hosted backend
    pub async fn hosted(config: Config, viewport_width: u32) -> Result<Self> {
        let backend = Arc::new(HostedBackend::new(config.backend(), config.auth())?);
        let preferences = Self::preference_store(&config);
        Self::new(config, backend.clone(), backend, preferences, viewport_width).await
    }

    pub async fn new(
        config: Config,
        auth: Arc<dyn AuthBackend>,
        alerts: Arc<dyn AlertBackend>,
        preferences: Arc<dyn PreferenceStore>,
        viewport_width: u32,
    ) -> Result<Self> {
        config.validate()?;

        let expiry = SessionExpirySignal::new();
        let session = Arc::new(SessionStore::new(
            auth,
            PasswordPolicy::from(config.auth()),
            expiry.clone(),
        ));
        let guard = Arc::new(RouteGuard::new(Arc::new(RouteTable::dashboard(
            config.routes(),
        ))));
        let sidebar = Sidebar::load(preferences, viewport_width, config.preferences()).await?;
        let environment = Arc::new(PageEnvironment::default());
        let inbox = Arc::new(InboxSlot {
            alerts,
            expiry,
            poller: LivenessPoller::new(config.polling()),
            environment: environment.clone(),
            current: Mutex::new(None),
        });

        let tasks = vec![
            session.listen_for_expiry(),
            Self::follow_identity(session.subscribe(), &inbox),
        ];

        Ok(Self {
            config,
            session,
            guard,
            sidebar,
            environment,
            inbox,
            tasks,
        })
    }

    /// File-backed when a path is configured, in-memory otherwise
    pub fn preference_store(config: &Config) -> Arc<dyn PreferenceStore> {
        match &config.preferences().path {
            Some(path) => Arc::new(FilePreferenceStore::new(path)),
            None => Arc::new(MemoryPreferenceStore::new()),
        }
    }

    fn follow_identity(
        mut session: watch::Receiver<SessionState>,
        slot: &Arc<InboxSlot>,
    ) -> JoinHandle<()> {
        let slot = Arc::downgrade(slot);
        tokio::spawn(async move {
            while session.changed().await.is_ok() {
                let identity = session.borrow_and_update().identity().cloned();
                let Some(slot) = slot.upgrade() else { break };
                if let Some(inbox) = slot.sync(identity.as_ref()) {
                    tokio::spawn(first_refresh(inbox));
                }
            }
        })
    }

    /// Resolve the persisted session and attach the inbox if one is restored
    pub async fn start(&self) {
        self.session.resolve().await;
        self.sync_inbox().await;
    }

    /// Sign in and return the path to land on
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<String> {
        let outcome = self.session.sign_in(email, password).await?;
        self.sync_inbox().await;
        Ok(self.guard.landing_after_sign_in(&outcome))
    }

    /// Set the new password on first access and return the path to land on
    pub async fn complete_first_access(&self, new_password: &str) -> Result<String> {
        self.session.update_password(new_password).await?;
        Ok(self.guard.take_return_target())
    }

    pub async fn sign_out(&self) {
        self.session.sign_out().await;
        self.inbox.sync(None);
    }

    async fn sync_inbox(&self) {
        let identity = self.session.identity();
        self.inbox.sync(identity.as_ref());
        // the identity watcher may have attached it first
        if let Some(inbox) = self.inbox.inbox() {
            first_refresh(inbox).await;
        }
    }

    /// Bind a view to `path` and the live session
    pub fn view(&self, path: &str) -> GuardedView {
        GuardedView::new(self.guard.clone(), self.session.subscribe(), path)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn guard(&self) -> &Arc<RouteGuard> {
        &self.guard
    }

    pub fn sidebar(&self) -> &Sidebar {
        &self.sidebar
    }

    pub fn environment(&self) -> &PageEnvironment {
        &self.environment
    }

    /// Alert inbox of the signed-in store, if any
    pub fn inbox(&self) -> Option<Arc<AlertInbox>> {
        self.inbox.inbox()
    }
}

impl Drop for AppContext {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
        self.inbox.sync(None);
    }
}
