pub mod notification;
pub mod schema;

use std::sync::Arc;

use pawmill_core::ServiceError;
use pawmill_sql::SQLStore;

/// Alerts service — the notification store.
pub struct AlertsService {
    pub(crate) sql: Arc<dyn SQLStore>,
}

impl AlertsService {
    pub fn new(sql: Arc<dyn SQLStore>) -> Result<Self, ServiceError> {
        schema::init_schema(sql.as_ref())?;
        Ok(Self { sql })
    }
}

#[cfg(test)]
pub(crate) mod testutil {
    use super::*;
    use pawmill_sql::SqliteStore;

    pub fn service() -> AlertsService {
        let sql = Arc::new(SqliteStore::open_in_memory().unwrap());
        AlertsService::new(sql).unwrap()
    }
}
