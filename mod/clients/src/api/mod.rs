pub mod client;
pub mod menu;
pub mod pet;

use std::sync::Arc;

use axum::Router;

use crate::service::ClientsService;

/// Shared application state.
pub type AppState = Arc<ClientsService>;

/// Build the clients API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/clients/v1", api_routes())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(client::routes())
        .merge(pet::routes())
        .merge(menu::routes())
}
