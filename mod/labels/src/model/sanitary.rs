use serde::{Deserialize, Serialize};

use crate::expiry::ExpiryStatus;

/// SanitaryLabel — a short-shelf-life label (hours to days), hour-granular.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SanitaryLabel {
    /// UUID primary key.
    #[serde(default)]
    pub id: String,

    pub product_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_code: Option<String>,

    /// RFC 3339 instant the food was prepared.
    pub prepared_at: String,

    /// RFC 3339 expiry instant. Status is derived from this at read time.
    pub expiry_at: String,

    #[serde(default)]
    pub printed: bool,

    /// Person responsible for preparation.
    pub responsible: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// API view with the derived status and remaining whole hours attached.
/// Negative hours mean the expiry instant has passed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SanitaryLabelView {
    #[serde(flatten)]
    pub label: SanitaryLabel,
    pub status: ExpiryStatus,
    pub hours_until_expiry: i64,
}
