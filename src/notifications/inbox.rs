//! Unread alert inbox for store-scoped identities

use super::environment::PageEnvironment;
use super::poller::{LivenessPoller, PollerHandle};
use crate::auth::session::SessionExpirySignal;
use crate::backend::AlertBackend;
use crate::core::models::{Alert, Identity};
use crate::utils::error::{DashboardError, Result};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

/// Non-blocking message for the user, shown as a toast
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub alert_id: Option<String>,
    pub message: String,
}

/// Why an acknowledgement failure still counts as the alert being gone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoneReason {
    PermissionDenied,
    NotFound,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AckOutcome {
    Acknowledged,
    /// Backend refused or no longer knows the alert; it stays removed locally
    AlreadyGone(GoneReason),
    /// Remote failure; the alert is back in the list for retry
    Retained,
    /// Not in the unread list
    Unknown,
}

/// Unread alerts for one store
pub struct AlertInbox {
    backend: Arc<dyn AlertBackend>,
    store_id: String,
    expiry: SessionExpirySignal,
    unread: watch::Sender<Vec<Alert>>,
    notices: broadcast::Sender<Notice>,
    acks: Mutex<AckLedger>,
}

/// Bookkeeping that keeps server snapshots from undoing local acknowledgements
#[derive(Debug, Default)]
struct AckLedger {
    /// Ticket handed to the most recently started fetch
    issued: u64,
    /// Ticket of the fetch whose result is currently shown
    applied: u64,
    /// Alerts removed locally whose acknowledgement is still in flight
    pending: HashSet<String>,
    /// Settled acknowledgements, keyed by the last ticket issued when they settled
    settled: HashMap<String, u64>,
}

impl AckLedger {
    fn begin_fetch(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    /// Filter a fetched snapshot, or `None` when a newer fetch already landed
    fn accept(&mut self, ticket: u64, alerts: Vec<Alert>) -> Option<Vec<Alert>> {
        if ticket < self.applied {
            return None;
        }
        self.applied = ticket;
        // Fetches started after an acknowledgement settled reflect it server-side
        self.settled.retain(|_, settled_at| *settled_at >= ticket);
        Some(
            alerts
                .into_iter()
                .filter(|alert| {
                    !self.pending.contains(&alert.id) && !self.settled.contains_key(&alert.id)
                })
                .collect(),
        )
    }

    fn settle(&mut self, alert_id: &str, gone: bool) {
        self.pending.remove(alert_id);
        if gone {
            self.settled.insert(alert_id.to_string(), self.issued);
        }
    }
}

impl std::fmt::Debug for AlertInbox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlertInbox")
            .field("store_id", &self.store_id)
            .field("unread", &self.unread.borrow().len())
            .finish()
    }
}

impl AlertInbox {
    pub fn new(
        backend: Arc<dyn AlertBackend>,
        store_id: impl Into<String>,
        expiry: SessionExpirySignal,
    ) -> Self {
        let (unread, _) = watch::channel(Vec::new());
        let (notices, _) = broadcast::channel(32);
        Self {
            backend,
            store_id: store_id.into(),
            expiry,
            unread,
            notices,
            acks: Mutex::new(AckLedger::default()),
        }
    }

    /// Inbox for store-scoped identities only
    pub fn for_identity(
        identity: &Identity,
        backend: Arc<dyn AlertBackend>,
        expiry: SessionExpirySignal,
    ) -> Option<Self> {
        let store_id = identity.alert_scope()?;
        Some(Self::new(backend, store_id, expiry))
    }

    pub fn store_id(&self) -> &str {
        &self.store_id
    }

    pub fn unread(&self) -> Vec<Alert> {
        self.unread.borrow().clone()
    }

    pub fn unread_count(&self) -> usize {
        self.unread.borrow().len()
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<Alert>> {
        self.unread.subscribe()
    }

    pub fn notices(&self) -> broadcast::Receiver<Notice> {
        self.notices.subscribe()
    }

    /// Fetch the unread list from the backend
    pub async fn refresh(&self) -> Result<usize> {
        let ticket = self.acks.lock().begin_fetch();
        let alerts = match self.backend.fetch_unread(&self.store_id).await {
            Ok(alerts) => alerts,
            Err(DashboardError::SessionExpired(reason)) => {
                self.expiry.raise(reason.clone());
                return Err(DashboardError::SessionExpired(reason));
            }
            Err(e) => return Err(e),
        };

        // publish under the ledger lock so an acknowledgement cannot slip in between
        let mut acks = self.acks.lock();
        let Some(mut alerts) = acks.accept(ticket, alerts) else {
            drop(acks);
            debug!("Dropping superseded alert fetch for store {}", self.store_id);
            return Ok(self.unread_count());
        };
        alerts.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let count = alerts.len();
        self.unread.send_replace(alerts);
        drop(acks);
        debug!("Store {} has {} unread alerts", self.store_id, count);
        Ok(count)
    }

    /// Acknowledge an alert. Removal is immediate; only unexpected failures bring it back.
    pub async fn mark_viewed(&self, alert_id: &str) -> AckOutcome {
        let mut removed = None;
        {
            let mut acks = self.acks.lock();
            self.unread.send_if_modified(|alerts| {
                let position = alerts.iter().position(|alert| alert.id == alert_id);
                removed = position.map(|index| alerts.remove(index));
                removed.is_some()
            });
            if removed.is_some() {
                acks.pending.insert(alert_id.to_string());
            }
        }
        let Some(alert) = removed else {
            return AckOutcome::Unknown;
        };

        let result = self.backend.acknowledge(alert_id, &self.store_id).await;
        let gone = match &result {
            Ok(()) => true,
            Err(e) => e.is_permission_denied() || e.is_not_found(),
        };
        self.acks.lock().settle(alert_id, gone);

        match result {
            Ok(()) => {
                info!("Alert {} acknowledged", alert_id);
                AckOutcome::Acknowledged
            }
            Err(e) if e.is_permission_denied() => {
                debug!("Alert {} acknowledgement denied, treating as gone: {}", alert_id, e);
                AckOutcome::AlreadyGone(GoneReason::PermissionDenied)
            }
            Err(e) if e.is_not_found() => {
                debug!("Alert {} no longer exists: {}", alert_id, e);
                AckOutcome::AlreadyGone(GoneReason::NotFound)
            }
            Err(e) => {
                warn!("Failed to acknowledge alert {}: {}", alert_id, e);
                if e.is_session_expired() {
                    self.expiry.raise(e.user_message());
                }
                self.restore(alert);
                let _ = self.notices.send(Notice {
                    alert_id: Some(alert_id.to_string()),
                    message: format!("Could not mark alert as read: {}", e.user_message()),
                });
                AckOutcome::Retained
            }
        }
    }

    fn restore(&self, alert: Alert) {
        self.unread.send_if_modified(|alerts| {
            if alerts.iter().any(|a| a.id == alert.id) {
                return false;
            }
            let index = alerts
                .iter()
                .position(|a| a.created_at < alert.created_at)
                .unwrap_or(alerts.len());
            alerts.insert(index, alert);
            true
        });
    }

    /// Keep this inbox fresh until the returned handle is dropped
    pub fn spawn_poller(
        self: &Arc<Self>,
        poller: &LivenessPoller,
        environment: &PageEnvironment,
    ) -> PollerHandle {
        let inbox = Arc::clone(self);
        poller.start(environment, move || {
            let inbox = Arc::clone(&inbox);
            async move { inbox.refresh().await.map(|_| ()) }
        })
    }
}
