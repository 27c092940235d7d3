use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Domain object classes subject to access control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Organization,
    Users,
    Products,
    Categories,
    Movements,
    Reports,
    Audit,
}

impl Resource {
    pub const ALL: [Resource; 7] = [
        Resource::Organization,
        Resource::Users,
        Resource::Products,
        Resource::Categories,
        Resource::Movements,
        Resource::Reports,
        Resource::Audit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Organization => "organization",
            Resource::Users => "users",
            Resource::Products => "products",
            Resource::Categories => "categories",
            Resource::Movements => "movements",
            Resource::Reports => "reports",
            Resource::Audit => "audit",
        }
    }
}

impl FromStr for Resource {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Resource::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| TokenError::UnknownResource(s.to_string()))
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    View,
    Create,
    Edit,
    Delete,
    Export,
    ManageRoles,
}

impl Action {
    pub const ALL: [Action; 6] = [
        Action::View,
        Action::Create,
        Action::Edit,
        Action::Delete,
        Action::Export,
        Action::ManageRoles,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::View => "view",
            Action::Create => "create",
            Action::Edit => "edit",
            Action::Delete => "delete",
            Action::Export => "export",
            Action::ManageRoles => "manage_roles",
        }
    }
}

impl FromStr for Action {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| TokenError::UnknownAction(s.to_string()))
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("permission token is empty")]
    Empty,
    #[error("permission token `{0}` has no `.` separator")]
    MissingSeparator(String),
    #[error("unknown resource `{0}`")]
    UnknownResource(String),
    #[error("unknown action `{0}`")]
    UnknownAction(String),
}

/// A `resource.action` token checked against the known vocabulary.
///
/// Lookups in the resolver stay string-keyed; this type exists so that tokens
/// written in code and in the role table can be validated up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PermissionToken {
    pub resource: Resource,
    pub action: Action,
}

impl PermissionToken {
    pub fn new(resource: Resource, action: Action) -> Self {
        Self { resource, action }
    }

    pub fn parse(token: &str) -> Result<Self, TokenError> {
        if token.is_empty() {
            return Err(TokenError::Empty);
        }

        let (resource, action) = token
            .split_once('.')
            .ok_or_else(|| TokenError::MissingSeparator(token.to_string()))?;

        Ok(Self {
            resource: resource.parse()?,
            action: action.parse()?,
        })
    }

    /// Canonical `resource.action` form.
    pub fn to_token(&self) -> String {
        format_token(self.resource.as_str(), self.action.as_str())
    }
}

impl FromStr for PermissionToken {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for PermissionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.resource, self.action)
    }
}

/// Join a resource and an action without validating either.
pub fn format_token(resource: &str, action: &str) -> String {
    format!("{resource}.{action}")
}

/// Well-known permission names
pub mod permissions {
    // Organization
    pub const ORGANIZATION_VIEW: &str = "organization.view";
    pub const ORGANIZATION_EDIT: &str = "organization.edit";
    pub const ORGANIZATION_DELETE: &str = "organization.delete";

    // Users
    pub const USERS_VIEW: &str = "users.view";
    pub const USERS_CREATE: &str = "users.create";
    pub const USERS_EDIT: &str = "users.edit";
    pub const USERS_DELETE: &str = "users.delete";
    pub const USERS_MANAGE_ROLES: &str = "users.manage_roles";

    // Products
    pub const PRODUCTS_VIEW: &str = "products.view";
    pub const PRODUCTS_CREATE: &str = "products.create";
    pub const PRODUCTS_EDIT: &str = "products.edit";
    pub const PRODUCTS_DELETE: &str = "products.delete";
    pub const PRODUCTS_EXPORT: &str = "products.export";

    // Categories
    pub const CATEGORIES_VIEW: &str = "categories.view";
    pub const CATEGORIES_CREATE: &str = "categories.create";
    pub const CATEGORIES_EDIT: &str = "categories.edit";
    pub const CATEGORIES_DELETE: &str = "categories.delete";

    // Movements
    pub const MOVEMENTS_VIEW: &str = "movements.view";
    pub const MOVEMENTS_CREATE: &str = "movements.create";
    pub const MOVEMENTS_EDIT: &str = "movements.edit";
    pub const MOVEMENTS_DELETE: &str = "movements.delete";

    // Reports
    pub const REPORTS_VIEW: &str = "reports.view";
    pub const REPORTS_EXPORT: &str = "reports.export";

    // Audit
    pub const AUDIT_VIEW: &str = "audit.view";
}
