use std::collections::HashSet;

use estocka_authz::authz::{CurrentUser, PermissionResolver, Role, RolePermissionTable, OWNER_ONLY};
use uuid::Uuid;

fn resolver_for(role: Role) -> PermissionResolver<Option<CurrentUser>> {
    PermissionResolver::new(Some(CurrentUser::new(Uuid::new_v4()).with_role(role.as_str())))
}

fn granted(role: Role) -> HashSet<&'static str> {
    resolver_for(role).list_granted_permissions().into_iter().collect()
}

#[test]
fn viewer_scenario() {
    let r = resolver_for(Role::Viewer);
    assert!(r.can_view("products"));
    assert!(!r.can_create("products"));
    assert!(!r.can_delete("products"));
    assert!(!r.can_export("reports"));
    assert!(!r.has_permission("audit.view"));
}

#[test]
fn operator_scenario() {
    let r = resolver_for(Role::Operator);
    assert!(r.can_create("movements"));
    assert!(!r.can_delete("movements"));
    assert!(!r.can_export("reports"));
    assert!(r.can_view("reports"));
}

#[test]
fn manager_scenario() {
    let r = resolver_for(Role::Manager);
    assert!(r.can_delete("products"));
    assert!(!r.can_delete("movements"));
    assert!(!r.has_permission("users.manage_roles"));
    assert!(r.can_export("reports"));
}

#[test]
fn admin_scenario() {
    let r = resolver_for(Role::Admin);
    assert!(r.has_permission("users.manage_roles"));
    assert!(!r.has_permission("organization.delete"));
    assert!(r.can_delete("categories"));
}

#[test]
fn owner_scenario() {
    let r = resolver_for(Role::Owner);
    assert!(r.has_permission("organization.delete"));

    let owner = granted(Role::Owner);
    for role in Role::ALL {
        assert!(granted(role).is_subset(&owner), "{role} holds something owner lacks");
    }
}

#[test]
fn grants_nest_along_privilege_order() {
    for higher in Role::ALL {
        let Some(lower) = higher.next_lower() else {
            continue;
        };
        let higher_set = granted(higher);
        for permission in granted(lower) {
            assert!(
                higher_set.contains(permission),
                "{permission} granted to {lower} but not {higher}"
            );
        }
    }
}

#[test]
fn owner_only_permissions_stay_with_owner() {
    let table = RolePermissionTable::global();
    for permission in OWNER_ONLY {
        assert_eq!(table.roles_with(permission), vec![Role::Owner]);
    }
}

#[test]
fn anonymous_and_unrecognized_resolve_to_viewer() {
    let anonymous: PermissionResolver<Option<CurrentUser>> = PermissionResolver::new(None);
    assert_eq!(anonymous.resolve_role(), Role::Viewer);
    assert_eq!(anonymous.list_granted_permissions(), resolver_for(Role::Viewer).list_granted_permissions());

    for name in ["", "user", "collaborator", "OWNER", "admin;drop"] {
        let r = PermissionResolver::new(Some(CurrentUser::new(Uuid::new_v4()).with_role(name)));
        assert_eq!(r.resolve_role(), Role::Viewer, "`{name}` should fall back to viewer");
        assert!(!r.is_admin());
    }
}

#[test]
fn movements_delete_reserved_to_admins() {
    let table = RolePermissionTable::global();
    assert_eq!(table.roles_with("movements.delete"), vec![Role::Owner, Role::Admin]);
}
