//! Authorization - static role table, permission resolver and route guards
//!
//! This module implements role-based access control for Estocka:
//! - Five fixed roles ordered by privilege (owner > admin > manager > operator > viewer)
//! - A static role -> permission table with nested grant sets
//! - A resolver that fails closed (unknown identity -> viewer, unknown token -> denied)
//! - Configurable enforcement modes (off/advisory/strict)

mod guard;
mod identity;
mod permission;
mod resolver;
mod role;
mod table;

pub use guard::Guard;
pub use identity::{CurrentUser, FnIdentity, IdentitySource, Session};
pub use permission::{format_token, permissions, Action, PermissionToken, Resource, TokenError};
pub use resolver::{PermissionResolver, PermissionSnapshot};
pub use role::{Role, UnknownRole};
pub use table::{RolePermissionTable, TableViolation, OWNER_ONLY};

/// Authorization enforcement mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthzMode {
    /// No permission checks (development mode)
    Off,
    /// Log denials but allow requests (testing mode)
    Advisory,
    /// Reject denied requests with 403 (production mode)
    #[default]
    Strict,
}

impl AuthzMode {
    /// Unknown or empty values enforce.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "off" => AuthzMode::Off,
            "advisory" => AuthzMode::Advisory,
            _ => AuthzMode::Strict,
        }
    }

    pub fn from_env() -> Self {
        Self::parse(&std::env::var("AUTHZ_MODE").unwrap_or_default())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AuthzMode::Off => "off",
            AuthzMode::Advisory => "advisory",
            AuthzMode::Strict => "strict",
        }
    }
}
