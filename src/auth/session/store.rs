//! Session store

use super::expiry::SessionExpirySignal;
use super::state::{SessionState, SignInOutcome};
use super::validation::{PasswordPolicy, normalize_email};
use crate::backend::AuthBackend;
use crate::core::models::Identity;
use crate::utils::error::{DashboardError, Result};
use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Owner of the authenticated identity for one browser context
pub struct SessionStore {
    backend: Arc<dyn AuthBackend>,
    policy: PasswordPolicy,
    expiry: SessionExpirySignal,
    state: watch::Sender<SessionState>,
    /// Bumped by every state-mutating operation; guards commits of async results
    generation: Mutex<u64>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("state", &*self.state.borrow())
            .field("generation", &*self.generation.lock())
            .finish()
    }
}

impl SessionStore {
    /// Create a store in the resolving state; call [`resolve`](Self::resolve) next
    pub fn new(
        backend: Arc<dyn AuthBackend>,
        policy: PasswordPolicy,
        expiry: SessionExpirySignal,
    ) -> Self {
        let (state, _) = watch::channel(SessionState::resolving());
        Self {
            backend,
            policy,
            expiry,
            state,
            generation: Mutex::new(0),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn identity(&self) -> Option<Identity> {
        self.state.borrow().identity().cloned()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading()
    }

    pub fn expiry_signal(&self) -> &SessionExpirySignal {
        &self.expiry
    }

    /// Start a new operation: bump the generation and apply `update` atomically
    fn begin(&self, update: impl FnOnce(&mut SessionState)) -> u64 {
        let mut generation = self.generation.lock();
        *generation += 1;
        self.state.send_modify(update);
        *generation
    }

    fn current_generation(&self) -> u64 {
        *self.generation.lock()
    }

    /// Publish `update` only if no newer operation started since `generation`
    fn commit(&self, generation: u64, update: impl FnOnce(&mut SessionState)) -> bool {
        let current = self.generation.lock();
        if *current != generation {
            return false;
        }
        self.state.send_modify(update);
        true
    }

    /// Resolve the persisted session at startup
    pub async fn resolve(&self) {
        let generation = self.begin(|state| state.set_loading(true));
        debug!("Resolving persisted session");

        let next = match self.backend.current_session().await {
            Ok(Some(grant)) => {
                info!("Restored session for {}", grant.identity.username);
                SessionState::signed_in(grant.identity, grant.first_access)
            }
            Ok(None) => SessionState::signed_out(),
            Err(e) => {
                warn!("Session resolution failed, continuing signed out: {}", e);
                SessionState::signed_out()
            }
        };

        if !self.commit(generation, |state| *state = next) {
            debug!("Session resolution superseded by a newer operation");
        }
    }

    /// Sign in with an email and password
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<SignInOutcome> {
        let email = normalize_email(email)?;
        let password = password.trim();
        if password.is_empty() {
            return Err(DashboardError::validation("Password is required"));
        }

        let previous = self.state();
        let generation = self.begin(|state| state.set_loading(true));
        info!("Signing in {}", email);

        match self.backend.sign_in(&email, password).await {
            Ok(grant) => {
                let outcome = SignInOutcome {
                    identity: grant.identity.clone(),
                    first_access: grant.first_access,
                };
                let committed = self.commit(generation, |state| {
                    *state = SessionState::signed_in(grant.identity, grant.first_access)
                });
                if !committed {
                    warn!("Discarding superseded sign-in response for {}", email);
                    return Err(DashboardError::auth("Sign-in superseded by a newer request"));
                }
                if outcome.first_access {
                    info!("{} is on the default credential", email);
                }
                Ok(outcome)
            }
            Err(e) => {
                self.commit(generation, |state| {
                    *state = previous;
                    state.set_loading(false);
                });
                debug!("Sign-in failed for {}: {}", email, e);
                Err(surface_auth_error(e))
            }
        }
    }

    /// Clear local identity, then notify the backend. Never fails.
    pub async fn sign_out(&self) {
        self.begin(|state| *state = SessionState::signed_out());
        info!("Signed out locally");

        if let Err(e) = self.backend.sign_out().await {
            warn!("Remote sign-out failed: {}", e);
        }
    }

    /// Reset an account to the default credential
    pub async fn reset_password(&self, email: &str) -> Result<()> {
        let email = normalize_email(email)?;
        info!("Password reset requested for {}", email);

        self.backend
            .reset_password(&email)
            .await
            .map_err(surface_auth_error)
    }

    /// Set a new password for the signed-in identity
    pub async fn update_password(&self, new_password: &str) -> Result<()> {
        let new_password = new_password.trim();
        self.policy.check(new_password)?;

        let generation = self.current_generation();
        match self.backend.update_password(new_password).await {
            Ok(()) => {
                self.commit(generation, SessionState::clear_first_access);
                info!("Password updated");
                Ok(())
            }
            Err(DashboardError::SessionExpired(reason)) => {
                self.expire(&reason);
                self.expiry.raise(reason.clone());
                Err(DashboardError::SessionExpired(reason))
            }
            Err(e) => Err(surface_auth_error(e)),
        }
    }

    /// Drop local state after the backend declared the session dead
    pub fn expire(&self, reason: &str) {
        let was_authenticated = self.is_authenticated();
        self.begin(|state| *state = SessionState::signed_out());
        if was_authenticated {
            info!("Cleared local session: {}", reason);
        }
    }

    /// Clear local state whenever the expiry signal fires
    pub fn listen_for_expiry(self: &Arc<Self>) -> JoinHandle<()> {
        let store: Weak<Self> = Arc::downgrade(self);
        let mut receiver = self.expiry.subscribe();

        tokio::spawn(async move {
            loop {
                let reason = match receiver.recv().await {
                    Ok(reason) => reason,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        format!("{} expiry signals missed", skipped)
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                };
                match store.upgrade() {
                    Some(store) => store.expire(&reason),
                    None => break,
                }
            }
            debug!("Session expiry listener stopped");
        })
    }
}

/// Backend payload errors reach the form as plain auth errors carrying the
/// backend's own message.
fn surface_auth_error(error: DashboardError) -> DashboardError {
    match error {
        DashboardError::Backend { message, .. } => DashboardError::Auth(message),
        other => other,
    }
}
