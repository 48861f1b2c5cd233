use pawmill_core::ServiceError;
use pawmill_sql::SQLStore;

/// SQL DDL for the notifications table.
///
/// `dedup_key` is the write-layer idempotency key: one notification per
/// (kind, related entity, variant, UTC day) and account. The UNIQUE
/// constraint is what makes duplicate emission a no-op instead of a race.
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS notifications (
        id TEXT PRIMARY KEY,
        owner_id TEXT NOT NULL,
        data TEXT NOT NULL,
        kind TEXT,
        related_id TEXT,
        read INTEGER,
        dedup_key TEXT NOT NULL,
        created_at TEXT,
        UNIQUE(owner_id, dedup_key)
    )",
    // Indexes
    "CREATE INDEX IF NOT EXISTS idx_notif_owner ON notifications(owner_id)",
    "CREATE INDEX IF NOT EXISTS idx_notif_read ON notifications(owner_id, read)",
    "CREATE INDEX IF NOT EXISTS idx_notif_related ON notifications(related_id)",
];

pub fn init_schema(sql: &dyn SQLStore) -> Result<(), ServiceError> {
    for stmt in SCHEMA {
        sql.exec(stmt, &[])
            .map_err(|e| ServiceError::Storage(format!("schema init failed: {}", e)))?;
    }
    Ok(())
}
