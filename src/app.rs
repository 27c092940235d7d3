use std::sync::Arc;

use axum::http::Method;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::authz::{AuthzMode, Guard};
use crate::errors::AppError;
use crate::jwt::JwtConfig;
use crate::routes::{auth, health, rbac};

#[derive(Clone)]
pub struct AppState {
    pub jwt: Arc<JwtConfig>,
    pub guard: Guard,
}

impl AppState {
    pub fn new(jwt: JwtConfig, mode: AuthzMode) -> Self {
        Self {
            jwt: Arc::new(jwt),
            guard: Guard::new(mode),
        }
    }

    pub fn from_env() -> Result<Self, AppError> {
        let jwt = JwtConfig::from_env()?;
        let mode = AuthzMode::from_env();
        tracing::info!(authz_mode = mode.as_str(), "authorization enforcement configured");
        Ok(Self::new(jwt, mode))
    }
}

pub async fn create_app() -> Result<Router, AppError> {
    Ok(router(AppState::from_env()?))
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_origin(Any)
        .allow_headers(Any);

    let auth_routes = Router::new()
        .route("/permissions", get(auth::my_permissions))
        .route("/permissions/check", get(auth::check_permission));

    Router::new()
        .route("/api/health", get(health::health))
        .nest("/auth", auth_routes)
        .nest("/rbac", rbac::routes())
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
