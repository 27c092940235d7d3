//! Read-only views of the static role table.
//!
//! All endpoints require a bearer token. Role listings are limited to owners and
//! admins; the full matrix requires `users.manage_roles`.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::app::AppState;
use crate::authz::{permissions, PermissionResolver, Role, RolePermissionTable};
use crate::errors::{AppError, AppResult};
use crate::jwt::AuthUser;

// =============================================================================
// ROUTER
// =============================================================================

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/roles", get(list_roles))
        .route("/roles/:role/permissions", get(get_role_permissions))
        .route("/matrix", get(get_matrix))
}

// =============================================================================
// MODELS
// =============================================================================

#[derive(Debug, Serialize, ToSchema)]
pub struct RoleGrants {
    pub role: Role,
    pub permissions: Vec<String>,
}

impl RoleGrants {
    fn of(role: Role) -> Self {
        Self {
            role,
            permissions: RolePermissionTable::global()
                .permissions_of(role)
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MatrixRow {
    pub permission: String,
    /// Roles holding the permission, most privileged first
    pub roles: Vec<Role>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PermissionMatrix {
    pub roles: Vec<Role>,
    pub rows: Vec<MatrixRow>,
}

// =============================================================================
// HANDLERS
// =============================================================================

/// List all roles in privilege order with their grants
#[utoipa::path(
    get,
    path = "/rbac/roles",
    tag = "RBAC",
    responses(
        (status = 200, description = "Roles with their permissions", body = Vec<RoleGrants>),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Caller is not an owner or admin"),
    ),
    security(("bearerAuth" = []))
)]
pub async fn list_roles(State(state): State<AppState>, auth: AuthUser) -> AppResult<Json<Vec<RoleGrants>>> {
    require_role_admin(&state, &auth)?;
    Ok(Json(Role::ALL.into_iter().map(RoleGrants::of).collect()))
}

/// Permissions granted to one role
#[utoipa::path(
    get,
    path = "/rbac/roles/{role}/permissions",
    tag = "RBAC",
    params(
        ("role" = String, Path, description = "Role name"),
    ),
    responses(
        (status = 200, description = "Role permissions", body = RoleGrants),
        (status = 403, description = "Caller is not an owner or admin"),
        (status = 404, description = "Unknown role"),
    ),
    security(("bearerAuth" = []))
)]
pub async fn get_role_permissions(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(role): Path<String>,
) -> AppResult<Json<RoleGrants>> {
    require_role_admin(&state, &auth)?;
    let role: Role = role
        .parse()
        .map_err(|err: crate::authz::UnknownRole| AppError::not_found(err.to_string()))?;
    Ok(Json(RoleGrants::of(role)))
}

/// Permission x role matrix
#[utoipa::path(
    get,
    path = "/rbac/matrix",
    tag = "RBAC",
    responses(
        (status = 200, description = "Permission matrix", body = PermissionMatrix),
        (status = 403, description = "Caller lacks users.manage_roles"),
    ),
    security(("bearerAuth" = []))
)]
pub async fn get_matrix(State(state): State<AppState>, auth: AuthUser) -> AppResult<Json<PermissionMatrix>> {
    let role = PermissionResolver::new(&auth).resolve_role();
    state.guard.require_permission(role, permissions::USERS_MANAGE_ROLES)?;

    Ok(Json(build_matrix()))
}

fn require_role_admin(state: &AppState, auth: &AuthUser) -> AppResult<()> {
    let role = PermissionResolver::new(auth).resolve_role();
    state.guard.require_role(role, &[Role::Owner, Role::Admin])
}

pub fn build_matrix() -> PermissionMatrix {
    let table = RolePermissionTable::global();
    let rows = table
        .all_permissions()
        .into_iter()
        .map(|permission| MatrixRow {
            permission: permission.to_string(),
            roles: table.roles_with(permission),
        })
        .collect();

    PermissionMatrix {
        roles: Role::ALL.to_vec(),
        rows,
    }
}
