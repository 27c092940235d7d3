//! Permissions of the calling session.
//!
//! Both endpoints accept anonymous callers, who resolve to the viewer role.

use axum::extract::Query;
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::authz::{PermissionResolver, PermissionSnapshot};
use crate::jwt::MaybeAuthUser;

#[utoipa::path(
    get,
    path = "/auth/permissions",
    tag = "Auth",
    responses(
        (status = 200, description = "Role and permissions of the caller", body = PermissionSnapshot),
        (status = 401, description = "Invalid bearer token")
    )
)]
pub async fn my_permissions(auth: MaybeAuthUser) -> Json<PermissionSnapshot> {
    Json(PermissionResolver::new(auth).snapshot())
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CheckQuery {
    /// Permission token, e.g. `products.delete`
    pub permission: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CheckResponse {
    pub permission: String,
    pub granted: bool,
}

#[utoipa::path(
    get,
    path = "/auth/permissions/check",
    tag = "Auth",
    params(CheckQuery),
    responses(
        (status = 200, description = "Whether the caller holds the permission", body = CheckResponse),
        (status = 401, description = "Invalid bearer token")
    )
)]
pub async fn check_permission(auth: MaybeAuthUser, Query(query): Query<CheckQuery>) -> Json<CheckResponse> {
    let granted = PermissionResolver::new(auth).has_permission(&query.permission);
    Json(CheckResponse {
        permission: query.permission,
        granted,
    })
}
