pub mod api;
pub mod model;
pub mod service;
pub mod supplier;

use std::sync::Arc;

use axum::Router;
use pawmill_core::Module;

use service::InventoryService;

/// Inventory module — ingredient stock with an append-only movement ledger
/// and optional push-sync to an external supplier system.
pub struct InventoryModule {
    service: Arc<InventoryService>,
}

impl InventoryModule {
    pub fn new(service: Arc<InventoryService>) -> Self {
        Self { service }
    }
}

impl Module for InventoryModule {
    fn name(&self) -> &str {
        "inventory"
    }

    fn routes(&self) -> Router {
        api::router(self.service.clone())
    }
}
