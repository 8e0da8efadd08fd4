//! In-memory backend used by tests and the offline demo

use super::{AlertBackend, AuthBackend, AuthGrant};
use crate::core::models::{Alert, Identity};
use crate::utils::error::{DashboardError, Result};
use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use std::collections::{HashMap, HashSet};
use tracing::debug;

#[derive(Debug, Clone)]
struct Account {
    password: String,
    identity: Identity,
}

/// Scripted failure returned by the next acknowledgements
#[derive(Debug, Clone)]
pub struct AckFailure {
    pub code: Option<String>,
    pub status: Option<u16>,
    pub message: String,
}

impl AckFailure {
    pub fn code(code: &str, message: &str) -> Self {
        Self {
            code: Some(code.to_string()),
            status: None,
            message: message.to_string(),
        }
    }

    fn to_error(&self) -> DashboardError {
        DashboardError::backend(self.code.clone(), self.status, self.message.clone())
    }
}

/// Backend keeping accounts and alerts in process memory
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    default_password: String,
    accounts: RwLock<HashMap<String, Account>>,
    current: RwLock<Option<(String, AuthGrant)>>,
    alerts: RwLock<Vec<Alert>>,
    viewed: RwLock<HashSet<(String, String)>>,
    offline: RwLock<bool>,
    fail_sign_out: RwLock<bool>,
    ack_failure: RwLock<Option<AckFailure>>,
    sign_in_attempts: Mutex<Vec<(String, String)>>,
    calls: Mutex<Vec<&'static str>>,
}

impl InMemoryBackend {
    pub fn new(default_password: impl Into<String>) -> Self {
        Self {
            default_password: default_password.into(),
            ..Default::default()
        }
    }

    pub fn with_account(self, email: &str, password: &str, identity: Identity) -> Self {
        self.accounts.write().insert(
            email.to_string(),
            Account {
                password: password.to_string(),
                identity,
            },
        );
        self
    }

    pub fn with_alert(self, alert: Alert) -> Self {
        self.alerts.write().push(alert);
        self
    }

    pub fn publish_alert(&self, alert: Alert) {
        self.alerts.write().push(alert);
    }

    pub fn set_offline(&self, offline: bool) {
        *self.offline.write() = offline;
    }

    pub fn fail_sign_out(&self, fail: bool) {
        *self.fail_sign_out.write() = fail;
    }

    pub fn fail_acknowledgements(&self, failure: Option<AckFailure>) {
        *self.ack_failure.write() = failure;
    }

    /// Expire the stored session, as the hosted service would after token expiry
    pub fn expire_session(&self) {
        *self.current.write() = None;
    }

    /// `(email, password)` pairs exactly as received
    pub fn sign_in_attempts(&self) -> Vec<(String, String)> {
        self.sign_in_attempts.lock().clone()
    }

    /// Names of every backend operation invoked, in order
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().clone()
    }

    pub fn password_of(&self, email: &str) -> Option<String> {
        self.accounts.read().get(email).map(|a| a.password.clone())
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().push(call);
    }

    fn ensure_online(&self) -> Result<()> {
        if *self.offline.read() {
            return Err(DashboardError::network("Backend unreachable"));
        }
        Ok(())
    }
}

#[async_trait]
impl AuthBackend for InMemoryBackend {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthGrant> {
        self.record("sign_in");
        self.sign_in_attempts
            .lock()
            .push((email.to_string(), password.to_string()));
        self.ensure_online()?;

        let account = self
            .accounts
            .read()
            .get(email)
            .cloned()
            .filter(|account| account.password == password)
            .ok_or_else(|| DashboardError::auth("Invalid login credentials"))?;

        let grant = AuthGrant {
            identity: account.identity,
            first_access: account.password == self.default_password,
        };
        *self.current.write() = Some((email.to_string(), grant.clone()));
        debug!("In-memory sign-in for {}", email);
        Ok(grant)
    }

    async fn sign_out(&self) -> Result<()> {
        self.record("sign_out");
        if *self.fail_sign_out.read() {
            return Err(DashboardError::network("Sign-out request failed"));
        }
        *self.current.write() = None;
        Ok(())
    }

    async fn reset_password(&self, email: &str) -> Result<()> {
        self.record("reset_password");
        self.ensure_online()?;

        let mut accounts = self.accounts.write();
        let account = accounts.get_mut(email).ok_or_else(|| {
            DashboardError::backend(Some("P0001".to_string()), Some(400), "User not found")
        })?;
        account.password = self.default_password.clone();
        Ok(())
    }

    async fn update_password(&self, new_password: &str) -> Result<()> {
        self.record("update_password");
        self.ensure_online()?;

        let mut current = self.current.write();
        let (email, grant) = current
            .as_mut()
            .ok_or_else(|| DashboardError::session_expired("Auth session missing"))?;

        if let Some(account) = self.accounts.write().get_mut(email.as_str()) {
            account.password = new_password.to_string();
        }
        grant.first_access = false;
        Ok(())
    }

    async fn current_session(&self) -> Result<Option<AuthGrant>> {
        self.record("current_session");
        Ok(self.current.read().as_ref().map(|(_, grant)| grant.clone()))
    }
}

#[async_trait]
impl AlertBackend for InMemoryBackend {
    async fn fetch_unread(&self, store_id: &str) -> Result<Vec<Alert>> {
        self.record("fetch_unread");
        self.ensure_online()?;

        let viewed = self.viewed.read();
        let mut alerts: Vec<Alert> = self
            .alerts
            .read()
            .iter()
            .filter(|a| a.store_id == store_id)
            .filter(|a| !viewed.contains(&(a.id.clone(), store_id.to_string())))
            .cloned()
            .collect();
        alerts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(alerts)
    }

    async fn acknowledge(&self, alert_id: &str, store_id: &str) -> Result<()> {
        self.record("acknowledge");
        self.ensure_online()?;

        if let Some(failure) = self.ack_failure.read().as_ref() {
            return Err(failure.to_error());
        }

        let exists = self
            .alerts
            .read()
            .iter()
            .any(|a| a.id == alert_id && a.store_id == store_id);
        if !exists {
            return Err(DashboardError::backend(
                Some("PGRST116".to_string()),
                Some(406),
                "Alert not found",
            ));
        }

        self.viewed
            .write()
            .insert((alert_id.to_string(), store_id.to_string()));
        Ok(())
    }
}
