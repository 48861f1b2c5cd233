use serde::{Deserialize, Serialize};

/// Client — a customer account. Pets and menus hang off it one-to-many.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    /// UUID primary key.
    #[serde(default)]
    pub id: String,

    /// Customer name.
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_json_roundtrip() {
        let c = Client {
            id: "client001".into(),
            name: "Maria Souza".into(),
            email: Some("maria@example.com".into()),
            phone: None,
            address: None,
            notes: None,
            created_at: Some("2025-01-01T00:00:00+00:00".into()),
            updated_at: None,
        };
        let json = serde_json::to_string(&c).unwrap();
        assert!(json.contains("\"createdAt\""));
        let back: Client = serde_json::from_str(&json).unwrap();
        assert_eq!(c, back);
    }
}
