use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Pagination parameters for list operations.
#[derive(Debug, Clone, Deserialize)]
pub struct ListParams {
    /// Maximum number of results to return.
    #[serde(default = "default_limit")]
    pub limit: usize,

    /// Offset for pagination.
    #[serde(default)]
    pub offset: usize,

    /// Name search term. Endpoints that support it filter by substring.
    #[serde(default)]
    pub q: Option<String>,
}

fn default_limit() -> usize {
    50
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            offset: 0,
            q: None,
        }
    }
}

/// Result wrapper for list operations.
#[derive(Debug, Clone, Serialize)]
pub struct ListResult<T: Serialize> {
    pub items: Vec<T>,
    pub total: usize,
}

/// Generate a new random ID (UUIDv4, no dashes).
pub fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Current time as an RFC 3339 string.
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339()
}

/// Parse an RFC 3339 string into a UTC timestamp. None on malformed input.
pub fn parse_rfc3339(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Merge a JSON patch into a base value (RFC 7386 JSON Merge Patch).
///
/// Keys with a `null` patch value are removed; nested objects merge
/// recursively; everything else replaces.
pub fn merge_patch(base: &mut serde_json::Value, patch: &serde_json::Value) {
    let (Some(base_obj), Some(patch_obj)) = (base.as_object_mut(), patch.as_object()) else {
        *base = patch.clone();
        return;
    };
    for (key, value) in patch_obj {
        if value.is_null() {
            base_obj.remove(key);
        } else if value.is_object() {
            let slot = base_obj
                .entry(key.clone())
                .or_insert_with(|| serde_json::Value::Object(Default::default()));
            merge_patch(slot, value);
        } else {
            base_obj.insert(key.clone(), value.clone());
        }
    }
}
