//! RBAC value types

use crate::core::models::Role;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Set of roles permitted to view a resource. Empty means any authenticated identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleSet(BTreeSet<Role>);

impl RoleSet {
    /// Any authenticated identity
    pub fn any() -> Self {
        Self(BTreeSet::new())
    }

    pub fn of(roles: &[Role]) -> Self {
        Self(roles.iter().copied().collect())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, role: Role) -> bool {
        self.0.contains(&role)
    }

    pub fn iter(&self) -> impl Iterator<Item = Role> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl FromIterator<Role> for RoleSet {
    fn from_iter<I: IntoIterator<Item = Role>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl std::fmt::Display for RoleSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            return f.write_str("*");
        }
        let names: Vec<&str> = self.0.iter().map(Role::as_str).collect();
        f.write_str(&names.join(","))
    }
}

/// Dashboard areas a role can be granted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Dashboard,
    Evaluations,
    Rankings,
    Goals,
    Trainings,
    Returns,
    Feedback,
    /// Store-facing unread alert inbox
    Alerts,
    /// Publishing alerts to stores
    AlertCenter,
    Stores,
    Users,
    Settings,
}

impl Section {
    pub const ALL: [Section; 12] = [
        Section::Dashboard,
        Section::Evaluations,
        Section::Rankings,
        Section::Goals,
        Section::Trainings,
        Section::Returns,
        Section::Feedback,
        Section::Alerts,
        Section::AlertCenter,
        Section::Stores,
        Section::Users,
        Section::Settings,
    ];
}
