use serde::{Deserialize, Serialize};

/// Product — a recipe/SKU that production runs and labels reference.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// UUID primary key.
    #[serde(default)]
    pub id: String,

    /// Unique per account.
    pub name: String,

    /// Main protein (e.g. "chicken", "beef").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protein: Option<String>,

    /// Shelf life of the packaged product; drives standard label expiry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shelf_life_days: Option<i64>,

    /// Shelf life of the fresh preparation; drives sanitary label expiry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sanitary_shelf_life_hours: Option<i64>,

    #[serde(default = "default_active")]
    pub active: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

fn default_active() -> bool {
    true
}
