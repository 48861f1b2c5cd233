pub mod product;
pub mod production;
pub mod schema;

use std::sync::Arc;

use pawmill_core::ServiceError;
use pawmill_sql::SQLStore;

use alerts::service::AlertsService;

/// Production service — products and production runs. Holds an alerts
/// handle so finishing a run can surface in the notification feed.
pub struct ProductionService {
    pub(crate) sql: Arc<dyn SQLStore>,
    pub(crate) alerts: Arc<AlertsService>,
}

impl ProductionService {
    pub fn new(sql: Arc<dyn SQLStore>, alerts: Arc<AlertsService>) -> Result<Self, ServiceError> {
        schema::init_schema(sql.as_ref())?;
        Ok(Self { sql, alerts })
    }
}

#[cfg(test)]
pub(crate) mod testutil {
    use super::*;
    use pawmill_sql::SqliteStore;

    pub fn service() -> ProductionService {
        let sql: Arc<dyn SQLStore> = Arc::new(SqliteStore::open_in_memory().unwrap());
        let alerts = Arc::new(AlertsService::new(sql.clone()).unwrap());
        ProductionService::new(sql, alerts).unwrap()
    }
}
