use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::authz::{Role, RolePermissionTable};

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub roles: usize,
    pub table_valid: bool,
}

#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Health",
    responses((status = 200, description = "Health check", body = HealthResponse))
)]
pub async fn health() -> Json<HealthResponse> {
    let violations = RolePermissionTable::global().validate();
    for violation in &violations {
        tracing::error!(%violation, "role table violation");
    }

    Json(HealthResponse {
        status: "ok",
        roles: Role::ALL.len(),
        table_valid: violations.is_empty(),
    })
}
