use pawmill_core::ServiceError;
use pawmill_sql::SQLStore;

/// SQL DDL for the production module tables.
///
/// Batch codes and product names are unique per account, enforced by the
/// store as the backstop behind the service-level pre-checks.
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS products (
        id TEXT PRIMARY KEY,
        owner_id TEXT NOT NULL,
        data TEXT NOT NULL,
        name TEXT NOT NULL,
        protein TEXT,
        created_at TEXT,
        updated_at TEXT,
        UNIQUE(owner_id, name)
    )",
    "CREATE TABLE IF NOT EXISTS productions (
        id TEXT PRIMARY KEY,
        owner_id TEXT NOT NULL,
        data TEXT NOT NULL,
        batch_code TEXT NOT NULL,
        product_id TEXT,
        status TEXT NOT NULL,
        created_at TEXT,
        updated_at TEXT,
        UNIQUE(owner_id, batch_code)
    )",
    // Indexes
    "CREATE INDEX IF NOT EXISTS idx_products_owner ON products(owner_id)",
    "CREATE INDEX IF NOT EXISTS idx_productions_owner ON productions(owner_id)",
    "CREATE INDEX IF NOT EXISTS idx_productions_status ON productions(owner_id, status)",
    "CREATE INDEX IF NOT EXISTS idx_productions_product ON productions(product_id)",
];

pub fn init_schema(sql: &dyn SQLStore) -> Result<(), ServiceError> {
    for stmt in SCHEMA {
        sql.exec(stmt, &[])
            .map_err(|e| ServiceError::Storage(format!("schema init failed: {}", e)))?;
    }
    Ok(())
}
