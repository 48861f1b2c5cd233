use std::path::Path;

use redb::{Database, TableDefinition};

use crate::error::KVError;
use crate::traits::KVStore;

const TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("kv");

/// KVStore backed by redb, a pure-Rust embedded key-value database.
pub struct RedbStore {
    db: Database,
}

impl RedbStore {
    /// Open or create a redb database at the given path.
    pub fn open(path: &Path) -> Result<Self, KVError> {
        let db = Database::create(path).map_err(|e| KVError::Storage(e.to_string()))?;

        // First write transaction creates the table.
        let txn = db.begin_write().map_err(|e| KVError::Storage(e.to_string()))?;
        {
            let _table = txn
                .open_table(TABLE)
                .map_err(|e| KVError::Storage(e.to_string()))?;
        }
        txn.commit().map_err(|e| KVError::Storage(e.to_string()))?;

        Ok(Self { db })
    }
}

impl KVStore for RedbStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KVError> {
        let txn = self
            .db
            .begin_read()
            .map_err(|e| KVError::Storage(e.to_string()))?;
        let table = txn
            .open_table(TABLE)
            .map_err(|e| KVError::Storage(e.to_string()))?;
        match table.get(key) {
            Ok(Some(v)) => Ok(Some(v.value().to_vec())),
            Ok(None) => Ok(None),
            Err(e) => Err(KVError::Storage(e.to_string())),
        }
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), KVError> {
        let txn = self
            .db
            .begin_write()
            .map_err(|e| KVError::Storage(e.to_string()))?;
        {
            let mut table = txn
                .open_table(TABLE)
                .map_err(|e| KVError::Storage(e.to_string()))?;
            table
                .insert(key, value)
                .map_err(|e| KVError::Storage(e.to_string()))?;
        }
        txn.commit().map_err(|e| KVError::Storage(e.to_string()))
    }

    fn delete(&self, key: &str) -> Result<(), KVError> {
        let txn = self
            .db
            .begin_write()
            .map_err(|e| KVError::Storage(e.to_string()))?;
        {
            let mut table = txn
                .open_table(TABLE)
                .map_err(|e| KVError::Storage(e.to_string()))?;
            table
                .remove(key)
                .map_err(|e| KVError::Storage(e.to_string()))?;
        }
        txn.commit().map_err(|e| KVError::Storage(e.to_string()))
    }

    fn scan(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, KVError> {
        let txn = self
            .db
            .begin_read()
            .map_err(|e| KVError::Storage(e.to_string()))?;
        let table = txn
            .open_table(TABLE)
            .map_err(|e| KVError::Storage(e.to_string()))?;

        let mut results = Vec::new();
        let iter = table
            .range(prefix..)
            .map_err(|e| KVError::Storage(e.to_string()))?;
        for entry in iter {
            let entry = entry.map_err(|e| KVError::Storage(e.to_string()))?;
            let key = entry.0.value().to_string();
            // Keys are sorted, so the first non-matching key ends the prefix run.
            if !key.starts_with(prefix) {
                break;
            }
            results.push((key, entry.1.value().to_vec()));
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_store() -> (tempfile::TempDir, RedbStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = RedbStore::open(&dir.path().join("test.redb")).unwrap();
        (dir, store)
    }

    #[test]
    fn set_get_delete() {
        let (_dir, store) = open_store();

        assert_eq!(store.get("settings:acct1").unwrap(), None);

        store.set("settings:acct1", b"{\"a\":1}").unwrap();
        assert_eq!(store.get("settings:acct1").unwrap().as_deref(), Some(&b"{\"a\":1}"[..]));

        store.set("settings:acct1", b"{\"a\":2}").unwrap();
        assert_eq!(store.get("settings:acct1").unwrap().as_deref(), Some(&b"{\"a\":2}"[..]));

        store.delete("settings:acct1").unwrap();
        assert_eq!(store.get("settings:acct1").unwrap(), None);

        // Deleting a missing key is fine.
        store.delete("settings:acct1").unwrap();
    }

    #[test]
    fn scan_returns_only_the_prefixed_namespace() {
        let (_dir, store) = open_store();

        store.set("settings:acct1", b"a").unwrap();
        store.set("settings:acct2", b"b").unwrap();
        store.set("settled", b"c").unwrap();
        store.set("tokens:acct1", b"d").unwrap();

        let pairs = store.scan("settings:").unwrap();
        assert_eq!(
            pairs,
            vec![
                ("settings:acct1".to_string(), b"a".to_vec()),
                ("settings:acct2".to_string(), b"b".to_vec()),
            ]
        );

        assert!(store.scan("missing:").unwrap().is_empty());
    }

    #[test]
    fn values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.redb");
        {
            let store = RedbStore::open(&path).unwrap();
            store.set("k", b"v").unwrap();
        }
        let store = RedbStore::open(&path).unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some(&b"v"[..]));
    }
}
