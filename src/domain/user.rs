//! Operators of the planning system.
//!
//! There is no role class hierarchy: a [`User`] carries a [`Role`] tag and
//! permission checks are lookups into a fixed capability table.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// What a role is allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    /// Create and remove users.
    ManageUsers,
    /// Register, reserve and distribute resources.
    ManageResources,
    /// Plan and process evacuations.
    PlanEvacuations,
    /// Read statistics and reports.
    ViewStatistics,
}

/// Role tag from a closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Full control.
    Admin,
    /// Day-to-day emergency operations.
    Operator,
}

/// Capability table, one row per role.
const CAPABILITIES: &[(Role, &[Capability])] = &[
    (
        Role::Admin,
        &[
            Capability::ManageUsers,
            Capability::ManageResources,
            Capability::PlanEvacuations,
            Capability::ViewStatistics,
        ],
    ),
    (
        Role::Operator,
        &[
            Capability::ManageResources,
            Capability::PlanEvacuations,
            Capability::ViewStatistics,
        ],
    ),
];

impl Role {
    /// Whether this role carries the given capability.
    #[must_use]
    pub fn allows(self, capability: Capability) -> bool {
        CAPABILITIES
            .iter()
            .find(|(role, _)| *role == self)
            .is_some_and(|(_, caps)| caps.contains(&capability))
    }

    /// Human-readable label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Admin => "Administrator",
            Self::Operator => "Emergency operator",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "operator" => Ok(Self::Operator),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// A person operating the system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier.
    pub id: String,
    /// Full name.
    pub name: String,
    /// Login name.
    pub username: String,
    /// Role tag.
    pub role: Role,
}

impl User {
    /// Creates a user.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        username: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            username: username.into(),
            role,
        }
    }

    /// Whether this user's role carries the given capability.
    #[must_use]
    pub fn can(&self, capability: Capability) -> bool {
        self.role.allows(capability)
    }
}

#[cfg(test)]
mod tests {
    use super::{Capability, Role, User};

    #[test]
    fn operators_cannot_manage_users() {
        let op = User::new("U1", "Ana", "ana", Role::Operator);
        assert!(op.can(Capability::ManageResources));
        assert!(op.can(Capability::ViewStatistics));
        assert!(!op.can(Capability::ManageUsers));
    }

    #[test]
    fn admins_can_do_everything() {
        for cap in [
            Capability::ManageUsers,
            Capability::ManageResources,
            Capability::PlanEvacuations,
            Capability::ViewStatistics,
        ] {
            assert!(Role::Admin.allows(cap));
        }
    }
}
