//! Dashboard roles

use serde::{Deserialize, Serialize};

/// Closed set of roles known to the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Network-wide administrator
    Admin,
    /// Regional supervisor of owned stores
    Supervisor,
    /// Supervisor of franchised stores
    SupervisorFranchise,
    /// Owned store account
    Store,
    /// Franchised store account
    StoreFranchise,
    /// Store manager with user administration rights
    StoreAdmin,
    /// Finance team
    Financial,
    /// Communication team
    Communication,
    /// Returns desk
    Returns,
    /// Delivery driver
    Driver,
    /// Digital channel team
    Digital,
    /// Store collaborator
    Collaborator,
}

impl Role {
    /// Every role, in declaration order
    pub const ALL: [Role; 12] = [
        Role::Admin,
        Role::Supervisor,
        Role::SupervisorFranchise,
        Role::Store,
        Role::StoreFranchise,
        Role::StoreAdmin,
        Role::Financial,
        Role::Communication,
        Role::Returns,
        Role::Driver,
        Role::Digital,
        Role::Collaborator,
    ];

    /// Wire identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Supervisor => "supervisor",
            Role::SupervisorFranchise => "supervisor_franchise",
            Role::Store => "store",
            Role::StoreFranchise => "store_franchise",
            Role::StoreAdmin => "store_admin",
            Role::Financial => "financial",
            Role::Communication => "communication",
            Role::Returns => "returns",
            Role::Driver => "driver",
            Role::Digital => "digital",
            Role::Collaborator => "collaborator",
        }
    }

    /// Roles whose data and notifications are restricted to a single store
    pub fn is_store_scoped(&self) -> bool {
        matches!(self, Role::Store | Role::StoreFranchise | Role::StoreAdmin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .iter()
            .copied()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| format!("Invalid role: {}", s))
    }
}
