//! Session snapshots

use crate::core::models::Identity;

/// Snapshot observed by subscribers.
///
/// Authentication is derived from the identity, so "authenticated without an
/// identity" is unrepresentable.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionState {
    identity: Option<Identity>,
    loading: bool,
    first_access: bool,
}

impl SessionState {
    /// Initial state while the persisted session is being resolved
    pub fn resolving() -> Self {
        Self {
            identity: None,
            loading: true,
            first_access: false,
        }
    }

    pub fn signed_out() -> Self {
        Self::default()
    }

    pub fn signed_in(identity: Identity, first_access: bool) -> Self {
        Self {
            identity: Some(identity),
            loading: false,
            first_access,
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Signed in on the default credential; a new password must be set first
    pub fn requires_password_change(&self) -> bool {
        self.identity.is_some() && self.first_access
    }

    pub(super) fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub(super) fn clear_first_access(&mut self) {
        self.first_access = false;
    }
}

/// Successful sign-in
#[derive(Debug, Clone, PartialEq)]
pub struct SignInOutcome {
    pub identity: Identity,
    /// Caller must route to the mandatory password-set flow
    pub first_access: bool,
}
