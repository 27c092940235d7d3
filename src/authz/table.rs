use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use super::permission::permissions::*;
use super::permission::PermissionToken;
use super::role::Role;

/// Permissions held only by the role they are listed under, exempt from the
/// nesting check.
pub const OWNER_ONLY: &[&str] = &[ORGANIZATION_DELETE];

const OWNER_GRANTS: &[&str] = &[
    ORGANIZATION_VIEW,
    ORGANIZATION_EDIT,
    ORGANIZATION_DELETE,
    USERS_VIEW,
    USERS_CREATE,
    USERS_EDIT,
    USERS_DELETE,
    USERS_MANAGE_ROLES,
    PRODUCTS_VIEW,
    PRODUCTS_CREATE,
    PRODUCTS_EDIT,
    PRODUCTS_DELETE,
    PRODUCTS_EXPORT,
    CATEGORIES_VIEW,
    CATEGORIES_CREATE,
    CATEGORIES_EDIT,
    CATEGORIES_DELETE,
    MOVEMENTS_VIEW,
    MOVEMENTS_CREATE,
    MOVEMENTS_EDIT,
    MOVEMENTS_DELETE,
    REPORTS_VIEW,
    REPORTS_EXPORT,
    AUDIT_VIEW,
];

const ADMIN_GRANTS: &[&str] = &[
    ORGANIZATION_VIEW,
    ORGANIZATION_EDIT,
    USERS_VIEW,
    USERS_CREATE,
    USERS_EDIT,
    USERS_DELETE,
    USERS_MANAGE_ROLES,
    PRODUCTS_VIEW,
    PRODUCTS_CREATE,
    PRODUCTS_EDIT,
    PRODUCTS_DELETE,
    PRODUCTS_EXPORT,
    CATEGORIES_VIEW,
    CATEGORIES_CREATE,
    CATEGORIES_EDIT,
    CATEGORIES_DELETE,
    MOVEMENTS_VIEW,
    MOVEMENTS_CREATE,
    MOVEMENTS_EDIT,
    MOVEMENTS_DELETE,
    REPORTS_VIEW,
    REPORTS_EXPORT,
    AUDIT_VIEW,
];

// Day-to-day management: full catalogue control, no user administration and
// no removal of stock history.
const MANAGER_GRANTS: &[&str] = &[
    ORGANIZATION_VIEW,
    USERS_VIEW,
    PRODUCTS_VIEW,
    PRODUCTS_CREATE,
    PRODUCTS_EDIT,
    PRODUCTS_DELETE,
    PRODUCTS_EXPORT,
    CATEGORIES_VIEW,
    CATEGORIES_CREATE,
    CATEGORIES_EDIT,
    CATEGORIES_DELETE,
    MOVEMENTS_VIEW,
    MOVEMENTS_CREATE,
    MOVEMENTS_EDIT,
    REPORTS_VIEW,
    REPORTS_EXPORT,
    AUDIT_VIEW,
];

const OPERATOR_GRANTS: &[&str] = &[
    ORGANIZATION_VIEW,
    PRODUCTS_VIEW,
    PRODUCTS_CREATE,
    PRODUCTS_EDIT,
    PRODUCTS_EXPORT,
    CATEGORIES_VIEW,
    CATEGORIES_CREATE,
    CATEGORIES_EDIT,
    MOVEMENTS_VIEW,
    MOVEMENTS_CREATE,
    REPORTS_VIEW,
];

const VIEWER_GRANTS: &[&str] = &[
    ORGANIZATION_VIEW,
    PRODUCTS_VIEW,
    CATEGORIES_VIEW,
    MOVEMENTS_VIEW,
    REPORTS_VIEW,
];

/// Grant set of one role: table order for display, a hash set for lookups.
#[derive(Debug)]
struct Grants {
    ordered: &'static [&'static str],
    lookup: HashSet<&'static str>,
}

impl Grants {
    fn new(ordered: &'static [&'static str]) -> Self {
        Self {
            ordered,
            lookup: ordered.iter().copied().collect(),
        }
    }
}

/// Static mapping from every [`Role`] to the permissions it grants.
#[derive(Debug)]
pub struct RolePermissionTable {
    grants: HashMap<Role, Grants>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableViolation {
    #[error("role `{0}` has no grant set")]
    MissingRole(Role),
    #[error("role `{role}` grants invalid token `{token}`: {reason}")]
    InvalidToken { role: Role, token: String, reason: String },
    #[error("role `{role}` lists `{token}` more than once")]
    DuplicateToken { role: Role, token: String },
    #[error("`{token}` is granted to `{lower}` but not to `{higher}`")]
    NotNested { token: String, lower: Role, higher: Role },
    #[error("owner-only permission `{token}` is granted to `{role}`")]
    OwnerOnlyLeak { token: String, role: Role },
}

impl RolePermissionTable {
    /// The process-wide table, built on first access.
    pub fn global() -> &'static RolePermissionTable {
        static TABLE: OnceLock<RolePermissionTable> = OnceLock::new();
        TABLE.get_or_init(RolePermissionTable::build)
    }

    fn build() -> Self {
        let grants = Role::ALL
            .into_iter()
            .map(|role| (role, Grants::new(grant_list(role))))
            .collect();
        Self { grants }
    }

    pub fn grants(&self, role: Role, permission: &str) -> bool {
        self.grants
            .get(&role)
            .map(|g| g.lookup.contains(permission))
            .unwrap_or(false)
    }

    /// Permissions of `role` in table order.
    pub fn permissions_of(&self, role: Role) -> &'static [&'static str] {
        self.grants.get(&role).map(|g| g.ordered).unwrap_or(&[])
    }

    /// Every distinct permission appearing in the table, in owner table order
    /// followed by anything only lower roles hold.
    pub fn all_permissions(&self) -> Vec<&'static str> {
        let mut seen = HashSet::new();
        Role::ALL
            .into_iter()
            .flat_map(|role| self.permissions_of(role).iter().copied())
            .filter(|p| seen.insert(*p))
            .collect()
    }

    /// Roles holding `permission`, in privilege order.
    pub fn roles_with(&self, permission: &str) -> Vec<Role> {
        Role::ALL
            .into_iter()
            .filter(|role| self.grants(*role, permission))
            .collect()
    }

    /// Check totality, vocabulary and nesting along the privilege order.
    pub fn validate(&self) -> Vec<TableViolation> {
        let mut violations = Vec::new();

        for role in Role::ALL {
            let Some(grants) = self.grants.get(&role) else {
                violations.push(TableViolation::MissingRole(role));
                continue;
            };

            let mut seen = HashSet::new();
            for token in grants.ordered {
                if let Err(err) = PermissionToken::parse(token) {
                    violations.push(TableViolation::InvalidToken {
                        role,
                        token: token.to_string(),
                        reason: err.to_string(),
                    });
                }
                if !seen.insert(*token) {
                    violations.push(TableViolation::DuplicateToken {
                        role,
                        token: token.to_string(),
                    });
                }
                if role != Role::Owner && OWNER_ONLY.contains(token) {
                    violations.push(TableViolation::OwnerOnlyLeak {
                        token: token.to_string(),
                        role,
                    });
                }
            }
        }

        for higher in Role::ALL {
            let Some(lower) = higher.next_lower() else {
                continue;
            };
            for token in self.permissions_of(lower) {
                if OWNER_ONLY.contains(token) {
                    continue;
                }
                if !self.grants(higher, token) {
                    violations.push(TableViolation::NotNested {
                        token: token.to_string(),
                        lower,
                        higher,
                    });
                }
            }
        }

        violations
    }
}

fn grant_list(role: Role) -> &'static [&'static str] {
    match role {
        Role::Owner => OWNER_GRANTS,
        Role::Admin => ADMIN_GRANTS,
        Role::Manager => MANAGER_GRANTS,
        Role::Operator => OPERATOR_GRANTS,
        Role::Viewer => VIEWER_GRANTS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_valid() {
        let violations = RolePermissionTable::global().validate();
        assert!(violations.is_empty(), "table violations: {violations:?}");
    }

    #[test]
    fn table_is_total() {
        let table = RolePermissionTable::global();
        for role in Role::ALL {
            assert!(!table.permissions_of(role).is_empty(), "{role} has no grants");
        }
    }

    #[test]
    fn grant_set_sizes() {
        let table = RolePermissionTable::global();
        assert_eq!(table.permissions_of(Role::Owner).len(), 24);
        assert_eq!(table.permissions_of(Role::Admin).len(), 23);
        assert_eq!(table.permissions_of(Role::Manager).len(), 17);
        assert_eq!(table.permissions_of(Role::Operator).len(), 11);
        assert_eq!(table.permissions_of(Role::Viewer).len(), 5);
    }

    #[test]
    fn organization_delete_is_owner_only() {
        let table = RolePermissionTable::global();
        assert_eq!(table.roles_with(ORGANIZATION_DELETE), vec![Role::Owner]);
    }

    #[test]
    fn all_permissions_matches_owner_set() {
        let table = RolePermissionTable::global();
        assert_eq!(table.all_permissions(), table.permissions_of(Role::Owner).to_vec());
    }

    #[test]
    fn validate_reports_broken_nesting() {
        let mut table = RolePermissionTable::build();
        table.grants.insert(Role::Manager, Grants::new(&[ORGANIZATION_VIEW]));
        let violations = table.validate();
        assert!(violations.contains(&TableViolation::NotNested {
            token: PRODUCTS_CREATE.to_string(),
            lower: Role::Operator,
            higher: Role::Manager,
        }));
    }

    #[test]
    fn validate_reports_owner_only_leak_and_typos() {
        let mut table = RolePermissionTable::build();
        table
            .grants
            .insert(Role::Viewer, Grants::new(&["organization.delete", "product.view"]));
        let violations = table.validate();
        assert!(violations.contains(&TableViolation::OwnerOnlyLeak {
            token: "organization.delete".to_string(),
            role: Role::Viewer,
        }));
        assert!(violations
            .iter()
            .any(|v| matches!(v, TableViolation::InvalidToken { token, .. } if token == "product.view")));
    }

    #[test]
    fn validate_reports_missing_role() {
        let mut table = RolePermissionTable::build();
        table.grants.remove(&Role::Operator);
        assert!(table.validate().contains(&TableViolation::MissingRole(Role::Operator)));
    }
}
