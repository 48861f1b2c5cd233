//! Route registration — module routes + system endpoints.

use std::sync::Arc;

use axum::middleware;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;

use pawmill_kv::KVStore;

use crate::auth_middleware::{self, JwtState};
use crate::settings;

/// Application shared state.
#[derive(Clone)]
pub struct AppState {
    pub jwt_state: Arc<JwtState>,
    pub kv: Arc<dyn KVStore>,
}

/// Build the complete router. Module routers already carry their
/// `/{module}/v1` prefixes; everything except `/health` and `/version` goes
/// through the JWT middleware.
pub fn build_router(state: AppState, module_routes: Vec<Router>) -> Router {
    let mut app = Router::new()
        .route("/health", get(health))
        .route("/version", get(version))
        .merge(settings::routes(state.kv.clone()));

    for router in module_routes {
        app = app.merge(router);
    }

    app.layer(middleware::from_fn_with_state(
        state.jwt_state,
        auth_middleware::auth_middleware,
    ))
}

async fn health() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "status": "ok",
    }))
}

async fn version() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": "pawmilld",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
