pub mod api;
pub mod model;
pub mod service;
pub mod stage;

use std::sync::Arc;

use axum::Router;
use pawmill_core::Module;

use service::ProductionService;

/// Production module — products, production runs, and the lifecycle stage
/// resolver.
pub struct ProductionModule {
    service: Arc<ProductionService>,
}

impl ProductionModule {
    pub fn new(service: Arc<ProductionService>) -> Self {
        Self { service }
    }
}

impl Module for ProductionModule {
    fn name(&self) -> &str {
        "production"
    }

    fn routes(&self) -> Router {
        api::router(self.service.clone())
    }
}
