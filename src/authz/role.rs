use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Fixed identity levels, declared from most to least privileged.
///
/// The derived `Ord` follows declaration order, so `Role::Owner < Role::Viewer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Owner,
    Admin,
    Manager,
    Operator,
    Viewer,
}

impl Role {
    /// All roles in privilege order, owner first.
    pub const ALL: [Role; 5] = [Role::Owner, Role::Admin, Role::Manager, Role::Operator, Role::Viewer];

    /// Least-privileged role, used whenever identity is missing or unrecognized.
    pub const FALLBACK: Role = Role::Viewer;

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Owner => "owner",
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Operator => "operator",
            Role::Viewer => "viewer",
        }
    }

    /// Resolve an optional role name, falling back to [`Role::FALLBACK`].
    pub fn resolve(name: Option<&str>) -> Role {
        match name.map(str::parse::<Role>) {
            Some(Ok(role)) => role,
            Some(Err(err)) => {
                tracing::debug!(%err, "unrecognized role, falling back to viewer");
                Self::FALLBACK
            }
            None => Self::FALLBACK,
        }
    }

    /// Privilege rank, 0 for owner.
    pub fn rank(&self) -> usize {
        *self as usize
    }

    /// The next role down the privilege order, if any.
    pub fn next_lower(&self) -> Option<Role> {
        Self::ALL.get(self.rank() + 1).copied()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    // Exact, case-sensitive match.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owner" => Ok(Role::Owner),
            "admin" => Ok(Role::Admin),
            "manager" => Ok(Role::Manager),
            "operator" => Ok(Role::Operator),
            "viewer" => Ok(Role::Viewer),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}
