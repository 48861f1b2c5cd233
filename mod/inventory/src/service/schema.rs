use pawmill_core::ServiceError;
use pawmill_sql::SQLStore;

/// SQL DDL for the inventory module tables.
///
/// JSON document storage with extracted indexed columns; `owner_id` on every
/// table for per-account isolation. Movements have no `updated_at` — the
/// ledger is append-only.
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS ingredients (
        id TEXT PRIMARY KEY,
        owner_id TEXT NOT NULL,
        data TEXT NOT NULL,
        name TEXT,
        supplier TEXT,
        created_at TEXT,
        updated_at TEXT
    )",
    "CREATE TABLE IF NOT EXISTS inventory_movements (
        id TEXT PRIMARY KEY,
        owner_id TEXT NOT NULL,
        data TEXT NOT NULL,
        ingredient_id TEXT,
        movement_type TEXT,
        production_id TEXT,
        created_at TEXT
    )",
    // Indexes
    "CREATE INDEX IF NOT EXISTS idx_ing_owner ON ingredients(owner_id)",
    "CREATE INDEX IF NOT EXISTS idx_ing_name ON ingredients(name)",
    "CREATE INDEX IF NOT EXISTS idx_mov_owner ON inventory_movements(owner_id)",
    "CREATE INDEX IF NOT EXISTS idx_mov_ingredient ON inventory_movements(ingredient_id)",
    "CREATE INDEX IF NOT EXISTS idx_mov_production ON inventory_movements(production_id)",
];

pub fn init_schema(sql: &dyn SQLStore) -> Result<(), ServiceError> {
    for stmt in SCHEMA {
        sql.exec(stmt, &[])
            .map_err(|e| ServiceError::Storage(format!("schema init failed: {}", e)))?;
    }
    Ok(())
}
