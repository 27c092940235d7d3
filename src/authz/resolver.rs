use serde::Serialize;
use utoipa::ToSchema;

use super::identity::IdentitySource;
use super::permission::{format_token, Action};
use super::role::Role;
use super::table::RolePermissionTable;

/// Answers authorization questions for whoever the identity source reports.
///
/// Every query re-reads the source, so login, logout and role changes are
/// visible immediately. Nothing here fails: a missing or unrecognized role
/// resolves to [`Role::Viewer`] and unknown permissions are denied.
#[derive(Debug, Clone)]
pub struct PermissionResolver<S> {
    source: S,
    table: &'static RolePermissionTable,
}

impl<S: IdentitySource> PermissionResolver<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            table: RolePermissionTable::global(),
        }
    }

    pub fn resolve_role(&self) -> Role {
        Role::resolve(self.source.current_role_name().as_deref())
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        let role = self.resolve_role();
        let granted = self.table.grants(role, permission);
        tracing::debug!(role = %role, permission = %permission, granted, "permission check");
        granted
    }

    fn can(&self, resource: &str, action: Action) -> bool {
        self.has_permission(&format_token(resource, action.as_str()))
    }

    pub fn can_view(&self, resource: &str) -> bool {
        self.can(resource, Action::View)
    }

    pub fn can_create(&self, resource: &str) -> bool {
        self.can(resource, Action::Create)
    }

    pub fn can_edit(&self, resource: &str) -> bool {
        self.can(resource, Action::Edit)
    }

    pub fn can_delete(&self, resource: &str) -> bool {
        self.can(resource, Action::Delete)
    }

    pub fn can_export(&self, resource: &str) -> bool {
        self.can(resource, Action::Export)
    }

    pub fn has_any_role(&self, candidates: &[Role]) -> bool {
        candidates.contains(&self.resolve_role())
    }

    pub fn is_admin(&self) -> bool {
        matches!(self.resolve_role(), Role::Admin | Role::Owner)
    }

    pub fn is_owner(&self) -> bool {
        self.resolve_role() == Role::Owner
    }

    /// All permissions of the current role, in table order.
    pub fn list_granted_permissions(&self) -> Vec<&'static str> {
        self.table.permissions_of(self.resolve_role()).to_vec()
    }

    /// Everything the UI needs in one read of the identity source.
    pub fn snapshot(&self) -> PermissionSnapshot {
        let role = self.resolve_role();
        PermissionSnapshot {
            role,
            is_admin: matches!(role, Role::Admin | Role::Owner),
            is_owner: role == Role::Owner,
            permissions: self
                .table
                .permissions_of(role)
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PermissionSnapshot {
    pub role: Role,
    pub is_admin: bool,
    pub is_owner: bool,
    pub permissions: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authz::identity::{CurrentUser, Session};
    use crate::authz::permission::Resource;
    use uuid::Uuid;

    fn as_role(role: Role) -> PermissionResolver<String> {
        PermissionResolver::new(role.as_str().to_string())
    }

    fn anonymous() -> PermissionResolver<Option<CurrentUser>> {
        PermissionResolver::new(None)
    }

    #[test]
    fn resolves_each_role() {
        for role in Role::ALL {
            assert_eq!(as_role(role).resolve_role(), role);
        }
    }

    #[test]
    fn unauthenticated_or_unknown_is_viewer() {
        assert_eq!(anonymous().resolve_role(), Role::Viewer);
        assert_eq!(PermissionResolver::new("root".to_string()).resolve_role(), Role::Viewer);
        assert_eq!(PermissionResolver::new(String::new()).resolve_role(), Role::Viewer);
        assert_eq!(PermissionResolver::new(" admin ".to_string()).resolve_role(), Role::Viewer);
        assert!(!PermissionResolver::new("owner ".to_string()).is_owner());

        let user_without_role = Some(CurrentUser::new(Uuid::new_v4()));
        assert_eq!(PermissionResolver::new(user_without_role).resolve_role(), Role::Viewer);
    }

    #[test]
    fn unknown_tokens_are_denied() {
        for role in Role::ALL {
            let resolver = as_role(role);
            for token in ["", "products", ".", "products.", ".view", "widgets.view", "products.read"] {
                assert!(!resolver.has_permission(token), "{role} granted `{token}`");
            }
            assert!(!resolver.can_view("widgets"));
            assert!(!resolver.can_view(""));
        }
    }

    #[test]
    fn sugar_matches_has_permission() {
        for role in Role::ALL {
            let r = as_role(role);
            for resource in Resource::ALL.map(|res| res.as_str()) {
                assert_eq!(r.can_view(resource), r.has_permission(&format!("{resource}.view")));
                assert_eq!(r.can_create(resource), r.has_permission(&format!("{resource}.create")));
                assert_eq!(r.can_edit(resource), r.has_permission(&format!("{resource}.edit")));
                assert_eq!(r.can_delete(resource), r.has_permission(&format!("{resource}.delete")));
                assert_eq!(r.can_export(resource), r.has_permission(&format!("{resource}.export")));
            }
        }
    }

    #[test]
    fn admin_and_owner_flags() {
        for role in Role::ALL {
            let r = as_role(role);
            assert_eq!(r.is_owner(), role == Role::Owner);
            assert_eq!(r.is_admin(), matches!(role, Role::Owner | Role::Admin));
            if r.is_owner() {
                assert!(r.is_admin());
            }
        }
        assert!(!anonymous().is_admin());
    }

    #[test]
    fn has_any_role() {
        let r = as_role(Role::Manager);
        assert!(r.has_any_role(&[Role::Admin, Role::Manager]));
        assert!(!r.has_any_role(&[Role::Owner, Role::Admin]));
        assert!(!r.has_any_role(&[]));
        assert!(anonymous().has_any_role(&[Role::Viewer]));
    }

    #[test]
    fn follows_session_changes() {
        let session = Session::new();
        let resolver = PermissionResolver::new(session.clone());
        assert!(!resolver.can_create("products"));

        session.login(CurrentUser::new(Uuid::new_v4()).with_role("operator"));
        assert!(resolver.can_create("products"));
        assert!(!resolver.can_delete("products"));

        session.refresh_role(Some("manager".into()));
        assert!(resolver.can_delete("products"));

        session.logout();
        assert_eq!(resolver.resolve_role(), Role::Viewer);
    }

    #[test]
    fn snapshot_matches_individual_queries() {
        let r = as_role(Role::Admin);
        let snapshot = r.snapshot();
        assert_eq!(snapshot.role, Role::Admin);
        assert!(snapshot.is_admin);
        assert!(!snapshot.is_owner);
        assert_eq!(
            snapshot.permissions,
            r.list_granted_permissions().iter().map(|p| p.to_string()).collect::<Vec<_>>()
        );
    }
}
