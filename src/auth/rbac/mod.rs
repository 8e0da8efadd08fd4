//! Role-based access control
//!
//! Pure lookups from a [`Role`](crate::core::models::Role) to what it may see.

mod registry;
mod types;

pub use registry::{RoleRegistry, is_allowed, is_role_name_allowed, visible_routes};
pub use types::{RoleSet, Section};
