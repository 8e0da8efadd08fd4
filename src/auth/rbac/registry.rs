//! Role registry

use super::types::{RoleSet, Section};
use crate::core::models::Role;
use crate::routing::{Route, RouteTable};
use tracing::debug;

/// Whether `role` may access a resource guarded by `required`.
///
/// An empty `required` set admits every authenticated identity.
pub fn is_allowed(role: Role, required: &RoleSet) -> bool {
    required.is_empty() || required.contains(role)
}

/// Menu entries of `table` that `role` may see
pub fn visible_routes(role: Role, table: &RouteTable) -> Vec<&Route> {
    table.menu_for(role)
}

/// Same as [`is_allowed`] for a raw role identifier. Unknown roles are denied.
pub fn is_role_name_allowed(role: &str, required: &RoleSet) -> bool {
    match role.parse::<Role>() {
        Ok(role) => is_allowed(role, required),
        Err(_) => {
            debug!("Denying unknown role '{}'", role);
            false
        }
    }
}

/// Static mapping from role to the dashboard sections it can see
#[derive(Debug, Clone, Copy, Default)]
pub struct RoleRegistry;

impl RoleRegistry {
    /// Sections granted to a role
    pub fn sections(role: Role) -> &'static [Section] {
        use Section::*;

        match role {
            Role::Admin => &Section::ALL,
            Role::Supervisor | Role::SupervisorFranchise => &[
                Dashboard,
                Evaluations,
                Rankings,
                Goals,
                Trainings,
                Returns,
                Feedback,
                Stores,
            ],
            Role::Store | Role::StoreFranchise => &[
                Dashboard,
                Evaluations,
                Rankings,
                Goals,
                Trainings,
                Returns,
                Feedback,
                Alerts,
            ],
            Role::StoreAdmin => &[
                Dashboard,
                Evaluations,
                Rankings,
                Goals,
                Trainings,
                Returns,
                Feedback,
                Alerts,
                Users,
            ],
            Role::Financial => &[Dashboard, Rankings, Goals, Returns],
            Role::Communication => &[Dashboard, Trainings, Feedback, AlertCenter],
            Role::Returns | Role::Driver => &[Dashboard, Returns],
            Role::Digital => &[Dashboard, Rankings, Goals, Feedback],
            Role::Collaborator => &[Dashboard, Goals, Trainings],
        }
    }

    pub fn can_access(role: Role, section: Section) -> bool {
        Self::sections(role).contains(&section)
    }

    /// Every role granted `section`
    pub fn roles_for(section: Section) -> RoleSet {
        Role::ALL
            .into_iter()
            .filter(|role| Self::can_access(*role, section))
            .collect()
    }
}
