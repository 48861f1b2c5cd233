use pawmill_core::ServiceError;
use pawmill_sql::SQLStore;

/// SQL DDL for the clients module tables.
///
/// Each table stores the full JSON document in a `data` TEXT column, with
/// indexed columns extracted for filtering. Every table carries `owner_id`
/// for per-account isolation.
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS clients (
        id TEXT PRIMARY KEY,
        owner_id TEXT NOT NULL,
        data TEXT NOT NULL,
        name TEXT,
        created_at TEXT,
        updated_at TEXT
    )",
    "CREATE TABLE IF NOT EXISTS pets (
        id TEXT PRIMARY KEY,
        owner_id TEXT NOT NULL,
        data TEXT NOT NULL,
        client_id TEXT,
        name TEXT,
        created_at TEXT,
        updated_at TEXT
    )",
    "CREATE TABLE IF NOT EXISTS menus (
        id TEXT PRIMARY KEY,
        owner_id TEXT NOT NULL,
        data TEXT NOT NULL,
        client_id TEXT,
        name TEXT,
        created_at TEXT,
        updated_at TEXT
    )",
    // Indexes
    "CREATE INDEX IF NOT EXISTS idx_clients_owner ON clients(owner_id)",
    "CREATE INDEX IF NOT EXISTS idx_pets_owner ON pets(owner_id)",
    "CREATE INDEX IF NOT EXISTS idx_pets_client ON pets(client_id)",
    "CREATE INDEX IF NOT EXISTS idx_menus_owner ON menus(owner_id)",
    "CREATE INDEX IF NOT EXISTS idx_menus_client ON menus(client_id)",
];

pub fn init_schema(sql: &dyn SQLStore) -> Result<(), ServiceError> {
    for stmt in SCHEMA {
        sql.exec(stmt, &[])
            .map_err(|e| ServiceError::Storage(format!("schema init failed: {}", e)))?;
    }
    Ok(())
}
