//! Domain models
//!
//! Identities, roles and store alerts as the rest of the crate sees them.

pub mod alert;
pub mod identity;
pub mod role;

pub use alert::Alert;
pub use identity::Identity;
pub use role::Role;
