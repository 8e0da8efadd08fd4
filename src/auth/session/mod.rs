//! Client-side session store
//!
//! Holds the authenticated identity, exposes it as an observable snapshot and
//! serializes every auth operation through a generation token so that a stale
//! backend response can never overwrite a newer state.

mod expiry;
mod state;
mod store;
mod validation;

pub use expiry::SessionExpirySignal;
pub use state::{SessionState, SignInOutcome};
pub use store::SessionStore;
pub use validation::{PasswordPolicy, normalize_email};
