//! Route guard state machine

use super::table::{Access, RouteTable, normalize_path};
use crate::auth::session::{SessionState, SignInOutcome};
use crate::core::models::Role;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, warn};

/// What the guard decided for the current path and session
#[derive(Debug, Clone, PartialEq)]
pub enum GuardState {
    /// Session resolution still in flight; render neither content nor a redirect
    Unknown,
    /// Public path, rendered without consulting the session
    Public { view: String },
    /// No identity; redirect to sign-in and come back to `return_to` afterwards
    Unauthenticated { redirect_to: String, return_to: String },
    /// Identity still on the default credential
    FirstAccessRequired { redirect_to: String },
    /// Identity lacks the role; render the access-denied placeholder
    Unauthorized { role: Role, path: String },
    Authorized { view: String },
    NotFound { path: String },
}

impl GuardState {
    pub fn is_authorized(&self) -> bool {
        matches!(self, GuardState::Authorized { .. } | GuardState::Public { .. })
    }

    /// Redirect target, if this state navigates away
    pub fn redirect(&self) -> Option<&str> {
        match self {
            GuardState::Unauthenticated { redirect_to, .. }
            | GuardState::FirstAccessRequired { redirect_to } => Some(redirect_to.as_str()),
            _ => None,
        }
    }
}

/// Evaluates paths against the route table and remembers where to return after sign-in
#[derive(Debug)]
pub struct RouteGuard {
    table: Arc<RouteTable>,
    return_target: Mutex<Option<String>>,
}

impl RouteGuard {
    pub fn new(table: Arc<RouteTable>) -> Self {
        Self {
            table,
            return_target: Mutex::new(None),
        }
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    pub fn evaluate(&self, session: &SessionState, path: &str) -> GuardState {
        let path = normalize_path(path);
        let route = self.table.lookup(&path);

        if let Some(route) = route {
            if let Access::Public = route.access {
                return GuardState::Public {
                    view: route.view.clone(),
                };
            }
        }

        if session.is_loading() {
            return GuardState::Unknown;
        }

        let Some(identity) = session.identity() else {
            debug!("No identity for {}, redirecting to sign-in", path);
            let return_to = match route {
                Some(_) => path,
                None => self.table.home_path().to_string(),
            };
            *self.return_target.lock() = Some(return_to.clone());
            return GuardState::Unauthenticated {
                redirect_to: self.table.sign_in_path().to_string(),
                return_to,
            };
        };

        if session.requires_password_change() {
            // only table routes are worth coming back to
            *self.return_target.lock() = route.map(|_| path.clone());
            return GuardState::FirstAccessRequired {
                redirect_to: self.table.first_access_path().to_string(),
            };
        }

        let Some(route) = route else {
            return GuardState::NotFound { path };
        };

        if !route.admits(identity.role) {
            warn!(
                "Access denied: role {} may not open {} ({})",
                identity.role, path, route.view
            );
            return GuardState::Unauthorized {
                role: identity.role,
                path,
            };
        }

        GuardState::Authorized {
            view: route.view.clone(),
        }
    }

    /// Remembered location, or the home path when none was recorded
    pub fn take_return_target(&self) -> String {
        self.return_target
            .lock()
            .take()
            .unwrap_or_else(|| self.table.home_path().to_string())
    }

    /// Where to navigate once a sign-in succeeds
    pub fn landing_after_sign_in(&self, outcome: &SignInOutcome) -> String {
        if outcome.first_access {
            // keep the return target for after the new password is set
            self.table.first_access_path().to_string()
        } else {
            self.take_return_target()
        }
    }
}

/// A protected view bound to the live session.
///
/// Re-evaluates on every navigation and every identity change.
#[derive(Debug)]
pub struct GuardedView {
    guard: Arc<RouteGuard>,
    session: watch::Receiver<SessionState>,
    path: String,
    state: GuardState,
}

impl GuardedView {
    pub fn new(
        guard: Arc<RouteGuard>,
        mut session: watch::Receiver<SessionState>,
        path: &str,
    ) -> Self {
        let state = guard.evaluate(&session.borrow_and_update(), path);
        Self {
            guard,
            session,
            path: normalize_path(path),
            state,
        }
    }

    pub fn state(&self) -> &GuardState {
        &self.state
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn navigate(&mut self, path: &str) -> &GuardState {
        self.path = normalize_path(path);
        self.reevaluate()
    }

    /// Wait for the next session change and re-evaluate. `None` once the store is gone.
    pub async fn next_change(&mut self) -> Option<&GuardState> {
        self.session.changed().await.ok()?;
        Some(self.reevaluate())
    }

    fn reevaluate(&mut self) -> &GuardState {
        let session = self.session.borrow_and_update().clone();
        self.state = self.guard.evaluate(&session, &self.path);
        &self.state
    }
}
