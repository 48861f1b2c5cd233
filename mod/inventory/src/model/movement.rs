use serde::{Deserialize, Serialize};

/// Direction of a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementType {
    In,
    Out,
}

impl MovementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Out => "out",
        }
    }
}

/// InventoryMovement — one entry of the append-only stock ledger.
/// Quantity is always a positive magnitude; direction carries the sign.
/// Ledger rows are never updated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InventoryMovement {
    /// UUID primary key.
    #[serde(default)]
    pub id: String,

    pub ingredient_id: String,

    pub movement_type: MovementType,

    pub quantity: f64,

    /// Production run that consumed or produced this stock, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub production_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}
