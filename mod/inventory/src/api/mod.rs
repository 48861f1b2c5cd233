pub mod ingredient;
pub mod movement;

use std::sync::Arc;

use axum::Router;

use crate::service::InventoryService;

/// Shared application state.
pub type AppState = Arc<InventoryService>;

/// Build the inventory API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/inventory/v1", api_routes())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(ingredient::routes())
        .merge(movement::routes())
}
