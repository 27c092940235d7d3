use super::role::Role;
use super::table::RolePermissionTable;
use super::AuthzMode;
use crate::errors::{AppError, AppResult};

/// Turns permission and role checks into request outcomes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Guard {
    pub mode: AuthzMode,
}

impl Guard {
    pub fn new(mode: AuthzMode) -> Self {
        Self { mode }
    }

    pub fn require_permission(&self, role: Role, permission: &str) -> AppResult<()> {
        if RolePermissionTable::global().grants(role, permission) {
            return Ok(());
        }
        self.deny(role, format!("Permission denied. Required: {permission}"))
    }

    pub fn require_role(&self, role: Role, allowed: &[Role]) -> AppResult<()> {
        if allowed.contains(&role) {
            return Ok(());
        }
        let names = allowed.iter().map(Role::as_str).collect::<Vec<_>>().join(", ");
        self.deny(role, format!("Access denied. Required role: {names}"))
    }

    fn deny(&self, role: Role, message: String) -> AppResult<()> {
        match self.mode {
            AuthzMode::Off => Ok(()),
            AuthzMode::Advisory => {
                tracing::warn!(role = %role, reason = %message, "advisory mode: allowing denied request");
                Ok(())
            }
            AuthzMode::Strict => {
                tracing::debug!(role = %role, reason = %message, "request denied");
                Err(AppError::forbidden(message))
            }
        }
    }
}
