use serde::{Deserialize, Serialize};

/// Pet — an animal belonging to a client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    /// UUID primary key.
    #[serde(default)]
    pub id: String,

    /// Owning client id.
    pub client_id: String,

    pub name: String,

    /// Species (e.g. "dog", "cat").
    pub species: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breed: Option<String>,

    /// Date of birth, `YYYY-MM-DD`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,

    /// Dietary restrictions, allergies, preferences.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub food_notes: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}
