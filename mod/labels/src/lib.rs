pub mod api;
pub mod expiry;
pub mod model;
pub mod print;
pub mod service;

use std::sync::Arc;

use axum::Router;
use pawmill_core::Module;

use service::LabelsService;

/// Labels module — standard product labels and short-shelf-life sanitary
/// labels, with expiry status derived on read.
pub struct LabelsModule {
    service: Arc<LabelsService>,
}

impl LabelsModule {
    pub fn new(service: Arc<LabelsService>) -> Self {
        Self { service }
    }
}

impl Module for LabelsModule {
    fn name(&self) -> &str {
        "labels"
    }

    fn routes(&self) -> Router {
        api::router(self.service.clone())
    }
}
