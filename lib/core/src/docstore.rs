//! Owner-scoped JSON document tables.
//!
//! Every entity table has the same shape: `id TEXT PRIMARY KEY`,
//! `owner_id TEXT NOT NULL`, `data TEXT NOT NULL` (the full JSON document),
//! plus extracted columns for filtering and uniqueness. These helpers are the
//! one place that builds row SQL; every statement filters on `owner_id`, so a
//! record belonging to another account behaves exactly like a missing record.

use serde::de::DeserializeOwned;
use serde::Serialize;

use pawmill_sql::{SQLStore, Value};

use crate::error::ServiceError;
use crate::owner::OwnerId;
use crate::types::{merge_patch, now_rfc3339, ListResult};

/// Insert a record as JSON with extracted indexed columns.
pub fn insert<T: Serialize>(
    sql: &dyn SQLStore,
    table: &str,
    owner: &OwnerId,
    id: &str,
    record: &T,
    indexes: &[(&str, Value)],
) -> Result<(), ServiceError> {
    let json = serde_json::to_string(record).map_err(|e| ServiceError::Internal(e.to_string()))?;

    let mut cols = vec!["id", "owner_id", "data"];
    let mut placeholders = vec!["?1".to_string(), "?2".to_string(), "?3".to_string()];
    let mut params = vec![
        Value::Text(id.to_string()),
        Value::Text(owner.0.clone()),
        Value::Text(json),
    ];

    for (i, (col, val)) in indexes.iter().enumerate() {
        cols.push(col);
        placeholders.push(format!("?{}", i + 4));
        params.push(val.clone());
    }

    let stmt = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table,
        cols.join(", "),
        placeholders.join(", "),
    );
    sql.exec(&stmt, &params)?;
    Ok(())
}

/// Get a record by id, deserializing the JSON `data` column.
pub fn get<T: DeserializeOwned>(
    sql: &dyn SQLStore,
    table: &str,
    owner: &OwnerId,
    id: &str,
) -> Result<T, ServiceError> {
    let stmt = format!("SELECT data FROM {table} WHERE id = ?1 AND owner_id = ?2");
    let rows = sql.query(&stmt, &[Value::Text(id.to_string()), Value::Text(owner.0.clone())])?;
    let row = rows
        .first()
        .ok_or_else(|| ServiceError::NotFound(format!("{table}/{id}")))?;
    let data = row
        .get_str("data")
        .ok_or_else(|| ServiceError::Internal("missing data column".into()))?;
    serde_json::from_str(data).map_err(|e| ServiceError::Internal(e.to_string()))
}

/// Replace a record's JSON data and indexed columns.
pub fn update<T: Serialize>(
    sql: &dyn SQLStore,
    table: &str,
    owner: &OwnerId,
    id: &str,
    record: &T,
    indexes: &[(&str, Value)],
) -> Result<(), ServiceError> {
    let json = serde_json::to_string(record).map_err(|e| ServiceError::Internal(e.to_string()))?;

    let mut sets = vec!["data = ?1".to_string()];
    let mut params: Vec<Value> = vec![Value::Text(json)];
    for (i, (col, val)) in indexes.iter().enumerate() {
        sets.push(format!("{} = ?{}", col, i + 2));
        params.push(val.clone());
    }

    let id_idx = params.len() + 1;
    let owner_idx = params.len() + 2;
    params.push(Value::Text(id.to_string()));
    params.push(Value::Text(owner.0.clone()));

    let stmt = format!(
        "UPDATE {} SET {} WHERE id = ?{} AND owner_id = ?{}",
        table,
        sets.join(", "),
        id_idx,
        owner_idx,
    );

    let affected = sql.exec(&stmt, &params)?;
    if affected == 0 {
        return Err(ServiceError::NotFound(format!("{table}/{id}")));
    }
    Ok(())
}

/// Delete a record by id.
pub fn delete(
    sql: &dyn SQLStore,
    table: &str,
    owner: &OwnerId,
    id: &str,
) -> Result<(), ServiceError> {
    let stmt = format!("DELETE FROM {table} WHERE id = ?1 AND owner_id = ?2");
    let affected = sql.exec(&stmt, &[Value::Text(id.to_string()), Value::Text(owner.0.clone())])?;
    if affected == 0 {
        return Err(ServiceError::NotFound(format!("{table}/{id}")));
    }
    Ok(())
}

/// List records with equality filters, a fixed order column, and pagination.
/// Returns the page plus the total matching count.
pub fn list<T: DeserializeOwned + Serialize>(
    sql: &dyn SQLStore,
    table: &str,
    owner: &OwnerId,
    filters: &[(&str, Value)],
    order_by: &str,
    limit: usize,
    offset: usize,
) -> Result<ListResult<T>, ServiceError> {
    let mut where_clauses = vec!["owner_id = ?1".to_string()];
    let mut params = vec![Value::Text(owner.0.clone())];
    for (i, (col, val)) in filters.iter().enumerate() {
        where_clauses.push(format!("{} = ?{}", col, i + 2));
        params.push(val.clone());
    }
    let where_sql = where_clauses.join(" AND ");

    let count_stmt = format!("SELECT COUNT(*) AS cnt FROM {table} WHERE {where_sql}");
    let count_rows = sql.query(&count_stmt, &params)?;
    let total = count_rows.first().and_then(|r| r.get_i64("cnt")).unwrap_or(0) as usize;

    let limit_idx = params.len() + 1;
    let offset_idx = params.len() + 2;
    params.push(Value::Integer(limit as i64));
    params.push(Value::Integer(offset as i64));

    let stmt = format!(
        "SELECT data FROM {table} WHERE {where_sql} ORDER BY {order_by} DESC \
         LIMIT ?{limit_idx} OFFSET ?{offset_idx}"
    );
    let rows = sql.query(&stmt, &params)?;

    let mut items = Vec::with_capacity(rows.len());
    for row in &rows {
        let data = row
            .get_str("data")
            .ok_or_else(|| ServiceError::Internal("missing data column".into()))?;
        items.push(serde_json::from_str(data).map_err(|e| ServiceError::Internal(e.to_string()))?);
    }
    Ok(ListResult { items, total })
}

/// List records whose `column` contains `needle` (case-insensitive LIKE),
/// newest first. Backs the `q` parameter on list endpoints.
pub fn search<T: DeserializeOwned + Serialize>(
    sql: &dyn SQLStore,
    table: &str,
    owner: &OwnerId,
    column: &str,
    needle: &str,
    order_by: &str,
    limit: usize,
    offset: usize,
) -> Result<ListResult<T>, ServiceError> {
    let pattern = format!("%{}%", needle.replace('%', "\\%").replace('_', "\\_"));
    let where_sql = format!("owner_id = ?1 AND {column} LIKE ?2 ESCAPE '\\'");
    let params = vec![Value::Text(owner.0.clone()), Value::Text(pattern)];

    let count_stmt = format!("SELECT COUNT(*) AS cnt FROM {table} WHERE {where_sql}");
    let count_rows = sql.query(&count_stmt, &params)?;
    let total = count_rows.first().and_then(|r| r.get_i64("cnt")).unwrap_or(0) as usize;

    let mut params = params;
    params.push(Value::Integer(limit as i64));
    params.push(Value::Integer(offset as i64));
    let stmt = format!(
        "SELECT data FROM {table} WHERE {where_sql} ORDER BY {order_by} DESC \
         LIMIT ?3 OFFSET ?4"
    );
    let rows = sql.query(&stmt, &params)?;

    let mut items = Vec::with_capacity(rows.len());
    for row in &rows {
        let data = row
            .get_str("data")
            .ok_or_else(|| ServiceError::Internal("missing data column".into()))?;
        items.push(serde_json::from_str(data).map_err(|e| ServiceError::Internal(e.to_string()))?);
    }
    Ok(ListResult { items, total })
}

/// Count records matching equality filters.
pub fn count(
    sql: &dyn SQLStore,
    table: &str,
    owner: &OwnerId,
    filters: &[(&str, Value)],
) -> Result<i64, ServiceError> {
    let mut where_clauses = vec!["owner_id = ?1".to_string()];
    let mut params = vec![Value::Text(owner.0.clone())];
    for (i, (col, val)) in filters.iter().enumerate() {
        where_clauses.push(format!("{} = ?{}", col, i + 2));
        params.push(val.clone());
    }
    let stmt = format!(
        "SELECT COUNT(*) AS cnt FROM {table} WHERE {}",
        where_clauses.join(" AND ")
    );
    let rows = sql.query(&stmt, &params)?;
    Ok(rows.first().and_then(|r| r.get_i64("cnt")).unwrap_or(0))
}

/// Distinct owner ids present in a table. The monitor scheduler uses this to
/// enumerate accounts to scan.
pub fn owners(sql: &dyn SQLStore, table: &str) -> Result<Vec<OwnerId>, ServiceError> {
    let stmt = format!("SELECT DISTINCT owner_id FROM {table}");
    let rows = sql.query(&stmt, &[])?;
    Ok(rows
        .iter()
        .filter_map(|r| r.get_str("owner_id").map(OwnerId::from))
        .collect())
}

/// Apply a JSON merge-patch to a record, protecting immutable fields and
/// stamping `updatedAt`.
pub fn apply_patch<T: Serialize + DeserializeOwned>(
    current: &T,
    patch: serde_json::Value,
) -> Result<T, ServiceError> {
    let mut base = serde_json::to_value(current).map_err(|e| ServiceError::Internal(e.to_string()))?;

    let mut patch = patch;
    if let Some(obj) = patch.as_object_mut() {
        obj.remove("id");
        obj.remove("createdAt");
        obj.insert("updatedAt".into(), serde_json::json!(now_rfc3339()));
    }

    merge_patch(&mut base, &patch);
    serde_json::from_value(base).map_err(|e| ServiceError::Validation(format!("bad patch: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pawmill_sql::SqliteStore;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Widget {
        id: String,
        name: String,
        created_at: String,
        updated_at: String,
    }

    fn store() -> SqliteStore {
        let s = SqliteStore::open_in_memory().unwrap();
        s.exec_batch(
            "CREATE TABLE widgets (
                id TEXT PRIMARY KEY,
                owner_id TEXT NOT NULL,
                data TEXT NOT NULL,
                name TEXT,
                created_at TEXT
            )",
        )
        .unwrap();
        s
    }

    fn widget(id: &str, name: &str) -> Widget {
        Widget {
            id: id.into(),
            name: name.into(),
            created_at: now_rfc3339(),
            updated_at: now_rfc3339(),
        }
    }

    #[test]
    fn crud_is_owner_scoped() {
        let sql = store();
        let alice = OwnerId::from("alice");
        let bob = OwnerId::from("bob");

        let w = widget("w1", "spinner");
        insert(&sql, "widgets", &alice, "w1", &w, &[("name", Value::Text("spinner".into()))])
            .unwrap();

        // Owner sees it; another account gets NotFound on every operation.
        let got: Widget = get(&sql, "widgets", &alice, "w1").unwrap();
        assert_eq!(got, w);
        assert!(matches!(
            get::<Widget>(&sql, "widgets", &bob, "w1"),
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            update(&sql, "widgets", &bob, "w1", &w, &[]),
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            delete(&sql, "widgets", &bob, "w1"),
            Err(ServiceError::NotFound(_))
        ));

        delete(&sql, "widgets", &alice, "w1").unwrap();
        assert!(get::<Widget>(&sql, "widgets", &alice, "w1").is_err());
    }

    #[test]
    fn list_filters_and_counts_per_owner() {
        let sql = store();
        let alice = OwnerId::from("alice");
        let bob = OwnerId::from("bob");

        for (owner, id) in [(&alice, "a1"), (&alice, "a2"), (&bob, "b1")] {
            let w = widget(id, "x");
            insert(&sql, "widgets", owner, id, &w, &[
                ("name", Value::Text("x".into())),
                ("created_at", Value::Text(w.created_at.clone())),
            ])
            .unwrap();
        }

        let page: ListResult<Widget> =
            list(&sql, "widgets", &alice, &[], "created_at", 50, 0).unwrap();
        assert_eq!(page.total, 2);
        assert_eq!(page.items.len(), 2);

        assert_eq!(count(&sql, "widgets", &bob, &[]).unwrap(), 1);

        let mut all = owners(&sql, "widgets").unwrap();
        all.sort_by(|a, b| a.0.cmp(&b.0));
        assert_eq!(all, vec![alice, bob]);
    }

    #[test]
    fn search_matches_substring_within_owner() {
        let sql = store();
        let alice = OwnerId::from("alice");
        let bob = OwnerId::from("bob");

        for (owner, id, name) in [
            (&alice, "a1", "Chicken jerky"),
            (&alice, "a2", "Beef strips"),
            (&bob, "b1", "Chicken feet"),
        ] {
            let w = widget(id, name);
            insert(&sql, "widgets", owner, id, &w, &[
                ("name", Value::Text(name.into())),
                ("created_at", Value::Text(w.created_at.clone())),
            ])
            .unwrap();
        }

        // Case-insensitive substring, scoped to the owner.
        let hits: ListResult<Widget> =
            search(&sql, "widgets", &alice, "name", "chick", "created_at", 50, 0).unwrap();
        assert_eq!(hits.total, 1);
        assert_eq!(hits.items[0].id, "a1");

        // LIKE wildcards in the needle are literal, not patterns.
        let wild: ListResult<Widget> =
            search(&sql, "widgets", &alice, "name", "%", "created_at", 50, 0).unwrap();
        assert_eq!(wild.total, 0);
    }

    #[test]
    fn patch_protects_immutable_fields() {
        let mut w = widget("w1", "spinner");
        w.updated_at = "2024-01-01T00:00:00+00:00".into();
        let created = w.created_at.clone();

        let patched: Widget = apply_patch(
            &w,
            serde_json::json!({"id": "evil", "createdAt": "1999-01-01T00:00:00Z", "name": "top"}),
        )
        .unwrap();

        assert_eq!(patched.id, "w1");
        assert_eq!(patched.created_at, created);
        assert_eq!(patched.name, "top");
        assert_ne!(patched.updated_at, w.updated_at);
    }
}
