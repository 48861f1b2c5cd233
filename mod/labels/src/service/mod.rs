pub mod label;
pub mod sanitary;
pub mod schema;

use std::sync::Arc;

use pawmill_core::{AccountSettings, OwnerId, ServiceError};
use pawmill_kv::KVStore;
use pawmill_sql::SQLStore;

/// Labels service — standard and sanitary labels. The KV store supplies the
/// per-account expiring windows used for classification.
pub struct LabelsService {
    pub(crate) sql: Arc<dyn SQLStore>,
    pub(crate) kv: Arc<dyn KVStore>,
}

impl LabelsService {
    pub fn new(sql: Arc<dyn SQLStore>, kv: Arc<dyn KVStore>) -> Result<Self, ServiceError> {
        schema::init_schema(sql.as_ref())?;
        Ok(Self { sql, kv })
    }

    pub(crate) fn settings(&self, owner: &OwnerId) -> Result<AccountSettings, ServiceError> {
        AccountSettings::load(self.kv.as_ref(), owner)
    }
}

#[cfg(test)]
pub(crate) mod testutil {
    use super::*;
    use pawmill_kv::RedbStore;
    use pawmill_sql::SqliteStore;

    pub fn service() -> (LabelsService, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let sql = Arc::new(SqliteStore::open_in_memory().unwrap());
        let kv = Arc::new(RedbStore::open(&dir.path().join("kv.redb")).unwrap());
        (LabelsService::new(sql, kv).unwrap(), dir)
    }
}
