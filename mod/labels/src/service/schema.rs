use pawmill_core::ServiceError;
use pawmill_sql::SQLStore;

/// SQL DDL for the labels module tables.
///
/// The expiry columns are extracted for range scans; the derived status is
/// deliberately not a column anywhere.
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS labels (
        id TEXT PRIMARY KEY,
        owner_id TEXT NOT NULL,
        data TEXT NOT NULL,
        production_id TEXT,
        printed INTEGER,
        expiry_date TEXT,
        created_at TEXT,
        updated_at TEXT
    )",
    "CREATE TABLE IF NOT EXISTS sanitary_labels (
        id TEXT PRIMARY KEY,
        owner_id TEXT NOT NULL,
        data TEXT NOT NULL,
        printed INTEGER,
        expiry_at TEXT,
        created_at TEXT,
        updated_at TEXT
    )",
    // Indexes
    "CREATE INDEX IF NOT EXISTS idx_labels_owner ON labels(owner_id)",
    "CREATE INDEX IF NOT EXISTS idx_labels_production ON labels(production_id)",
    "CREATE INDEX IF NOT EXISTS idx_labels_expiry ON labels(expiry_date)",
    "CREATE INDEX IF NOT EXISTS idx_san_owner ON sanitary_labels(owner_id)",
    "CREATE INDEX IF NOT EXISTS idx_san_expiry ON sanitary_labels(expiry_at)",
];

pub fn init_schema(sql: &dyn SQLStore) -> Result<(), ServiceError> {
    for stmt in SCHEMA {
        sql.exec(stmt, &[])
            .map_err(|e| ServiceError::Storage(format!("schema init failed: {}", e)))?;
    }
    Ok(())
}
