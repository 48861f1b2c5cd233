pub mod client;
pub mod menu;
pub mod pet;
pub mod schema;

use std::sync::Arc;

use pawmill_core::ServiceError;
use pawmill_sql::SQLStore;

/// Clients service — client, pet, and menu records.
pub struct ClientsService {
    pub(crate) sql: Arc<dyn SQLStore>,
}

impl ClientsService {
    pub fn new(sql: Arc<dyn SQLStore>) -> Result<Self, ServiceError> {
        schema::init_schema(sql.as_ref())?;
        Ok(Self { sql })
    }
}

#[cfg(test)]
pub(crate) mod testutil {
    use super::*;
    use pawmill_sql::SqliteStore;

    pub fn service() -> ClientsService {
        let sql = Arc::new(SqliteStore::open_in_memory().unwrap());
        ClientsService::new(sql).unwrap()
    }
}
