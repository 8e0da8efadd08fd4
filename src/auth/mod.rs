//! Authentication and authorization
//!
//! Role-based access control and the client-side session store.

pub mod rbac;
pub mod session;

pub use rbac::{RoleRegistry, RoleSet, Section, is_allowed};
pub use session::{
    PasswordPolicy, SessionExpirySignal, SessionState, SessionStore, SignInOutcome,
};
