pub mod product;
pub mod production;

use std::sync::Arc;

use axum::Router;

use crate::service::ProductionService;

/// Shared application state.
pub type AppState = Arc<ProductionService>;

/// Build the production API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/production/v1", api_routes())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(product::routes())
        .merge(production::routes())
}
