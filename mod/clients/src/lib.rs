pub mod api;
pub mod model;
pub mod service;

use std::sync::Arc;

use axum::Router;
use pawmill_core::Module;

use service::ClientsService;

/// Clients module — customer records with their pets and feeding menus.
pub struct ClientsModule {
    service: Arc<ClientsService>,
}

impl ClientsModule {
    pub fn new(service: Arc<ClientsService>) -> Self {
        Self { service }
    }
}

impl Module for ClientsModule {
    fn name(&self) -> &str {
        "clients"
    }

    fn routes(&self) -> Router {
        api::router(self.service.clone())
    }
}
