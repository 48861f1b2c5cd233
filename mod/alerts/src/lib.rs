pub mod api;
pub mod model;
pub mod monitor;
pub mod service;

use std::sync::Arc;

use axum::Router;
use pawmill_core::Module;

use service::AlertsService;

/// Alerts module — the notification feed plus the background stock and
/// expiry monitors that write into it.
pub struct AlertsModule {
    service: Arc<AlertsService>,
}

impl AlertsModule {
    pub fn new(service: Arc<AlertsService>) -> Self {
        Self { service }
    }
}

impl Module for AlertsModule {
    fn name(&self) -> &str {
        "alerts"
    }

    fn routes(&self) -> Router {
        api::router(self.service.clone())
    }
}
