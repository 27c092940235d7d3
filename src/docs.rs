use serde_json::{json, Value};
use utoipa::OpenApi;

use crate::authz::{PermissionSnapshot, Role};
use crate::routes::{auth, health, rbac};

#[derive(OpenApi)]
#[openapi(
	paths(
		health::health,
		auth::my_permissions,
		auth::check_permission,
		rbac::list_roles,
		rbac::get_role_permissions,
		rbac::get_matrix
	),
	components(
		schemas(
			Role,
			PermissionSnapshot,
			health::HealthResponse,
			auth::CheckResponse,
			rbac::RoleGrants,
			rbac::MatrixRow,
			rbac::PermissionMatrix
		)
	),
	tags(
		(name = "Health", description = "Service health"),
		(name = "Auth", description = "Permissions of the calling session"),
		(name = "RBAC", description = "Static role table")
	)
)]
pub struct ApiDoc;

pub fn build_openapi(port: u16) -> anyhow::Result<utoipa::openapi::OpenApi> {
	let mut doc = serde_json::to_value(ApiDoc::openapi())?;

	ensure_security_components(&mut doc);
	ensure_servers(&mut doc, port);

	Ok(serde_json::from_value(doc)?)
}

fn ensure_security_components(doc: &mut Value) {
	let Some(root) = doc.as_object_mut() else {
		return;
	};
	let components = root.entry("components").or_insert_with(|| json!({}));
	if let Some(components) = components.as_object_mut() {
		let schemes = components.entry("securitySchemes").or_insert_with(|| json!({}));
		if let Some(schemes) = schemes.as_object_mut() {
			schemes.entry("bearerAuth").or_insert_with(|| {
				json!({"type": "http", "scheme": "bearer", "bearerFormat": "JWT"})
			});
		}
	}
}

fn ensure_servers(doc: &mut Value, port: u16) {
	if let Some(root) = doc.as_object_mut() {
		root.insert(
			"servers".to_string(),
			json!([{ "url": format!("http://localhost:{port}") }]),
		);
	}
}
