pub mod ingredient;
pub mod movement;
pub mod schema;

use std::sync::Arc;

use pawmill_core::ServiceError;
use pawmill_kv::KVStore;
use pawmill_sql::SQLStore;

/// Inventory service — ingredients, the movement ledger, and supplier sync.
/// The KV store is only used to load per-account supplier settings.
pub struct InventoryService {
    pub(crate) sql: Arc<dyn SQLStore>,
    pub(crate) kv: Arc<dyn KVStore>,
}

impl InventoryService {
    pub fn new(sql: Arc<dyn SQLStore>, kv: Arc<dyn KVStore>) -> Result<Self, ServiceError> {
        schema::init_schema(sql.as_ref())?;
        Ok(Self { sql, kv })
    }
}

#[cfg(test)]
pub(crate) mod testutil {
    use super::*;
    use pawmill_kv::RedbStore;
    use pawmill_sql::SqliteStore;

    pub fn service() -> (InventoryService, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let sql = Arc::new(SqliteStore::open_in_memory().unwrap());
        let kv = Arc::new(RedbStore::open(&dir.path().join("kv.redb")).unwrap());
        (InventoryService::new(sql, kv).unwrap(), dir)
    }
}
