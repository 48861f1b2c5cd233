use serde::{Deserialize, Serialize};

use crate::expiry::ExpiryStatus;

/// Label — a standard product label with day-granular shelf life.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Label {
    /// UUID primary key.
    #[serde(default)]
    pub id: String,

    pub product_name: String,

    pub batch_code: String,

    /// Production run this label was printed for, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub production_id: Option<String>,

    /// `YYYY-MM-DD`.
    pub production_date: String,

    /// `YYYY-MM-DD`. Status is derived from this at read time.
    pub expiry_date: String,

    #[serde(default)]
    pub printed: bool,

    #[serde(default = "default_quantity")]
    pub quantity: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

fn default_quantity() -> u32 {
    1
}

/// API view with the derived expiry status attached.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelView {
    #[serde(flatten)]
    pub label: Label,
    pub status: ExpiryStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_json_roundtrip() {
        let l = Label {
            id: "lbl001".into(),
            product_name: "Chicken & pumpkin".into(),
            batch_code: "B-2025-014".into(),
            production_id: None,
            production_date: "2025-03-01".into(),
            expiry_date: "2025-06-01".into(),
            printed: false,
            quantity: 12,
            created_at: None,
            updated_at: None,
        };
        let json = serde_json::to_string(&l).unwrap();
        assert!(json.contains("\"expiryDate\":\"2025-06-01\""));
        let back: Label = serde_json::from_str(&json).unwrap();
        assert_eq!(l, back);
    }
}
