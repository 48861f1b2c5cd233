pub mod label;
pub mod sanitary;

use std::sync::Arc;

use axum::Router;

use crate::service::LabelsService;

/// Shared application state.
pub type AppState = Arc<LabelsService>;

/// Build the labels API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/labels/v1", api_routes())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(label::routes())
        .merge(sanitary::routes())
}
