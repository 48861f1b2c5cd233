pub mod notification;

use std::sync::Arc;

use axum::Router;

use crate::service::AlertsService;

/// Shared application state.
pub type AppState = Arc<AlertsService>;

/// Build the alerts API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/alerts/v1", notification::routes())
        .with_state(state)
}
