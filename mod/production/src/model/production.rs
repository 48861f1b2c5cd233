use serde::{Deserialize, Serialize};

use crate::stage::StageView;

/// Production lifecycle status. Transitions are monotonic: open →
/// in_progress → finished, never backward. The derived `Ord` follows
/// declaration order, which is the lifecycle order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductionStatus {
    #[default]
    Open,
    InProgress,
    Finished,
}

impl ProductionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Finished => "finished",
        }
    }
}

/// Production — one batch run through the three-stage workflow. Created
/// when the batch starts and mutated field by field as production proceeds;
/// the stage view and yield are derived on read, never stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Production {
    /// UUID primary key.
    #[serde(default)]
    pub id: String,

    /// Unique per account.
    pub batch_code: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protein: Option<String>,

    // Quality checkpoints.
    #[serde(default)]
    pub initial_cleaning_done: bool,
    #[serde(default)]
    pub ppe_used: bool,
    #[serde(default)]
    pub final_cleaning_done: bool,
    #[serde(default)]
    pub visual_analysis_passed: bool,

    // Weights along the workflow (kg).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frozen_weight_kg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thawed_weight_kg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clean_weight_kg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_weight_kg: Option<f64>,

    // Workflow timestamps (RFC 3339).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thaw_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dehydrator_entry_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dehydrator_exit_time: Option<String>,

    // Environment readings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ambient_temp_c: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dehydrator_temp_c: Option<f64>,

    // Packaging.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_size_g: Option<f64>,

    #[serde(default)]
    pub status: ProductionStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Production {
    /// Final output weight over frozen input weight, as a percentage.
    /// None until both weights are recorded.
    pub fn yield_pct(&self) -> Option<f64> {
        match (self.final_weight_kg, self.frozen_weight_kg) {
            (Some(final_kg), Some(frozen_kg)) if frozen_kg > 0.0 => {
                Some(final_kg / frozen_kg * 100.0)
            }
            _ => None,
        }
    }
}

/// API view of a production with the derived fields attached.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionView {
    #[serde(flatten)]
    pub production: Production,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yield_pct: Option<f64>,
    pub stage: StageView,
}

impl From<Production> for ProductionView {
    fn from(production: Production) -> Self {
        let yield_pct = production.yield_pct();
        let stage = crate::stage::resolve(&production);
        Self {
            production,
            yield_pct,
            stage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_order_follows_lifecycle() {
        assert!(ProductionStatus::Open < ProductionStatus::InProgress);
        assert!(ProductionStatus::InProgress < ProductionStatus::Finished);
    }

    #[test]
    fn yield_needs_both_weights_and_positive_input() {
        let mut p = Production {
            id: "p1".into(),
            batch_code: "B-1".into(),
            product_id: None,
            protein: None,
            initial_cleaning_done: false,
            ppe_used: false,
            final_cleaning_done: false,
            visual_analysis_passed: false,
            frozen_weight_kg: None,
            thawed_weight_kg: None,
            clean_weight_kg: None,
            final_weight_kg: None,
            thaw_time: None,
            dehydrator_entry_time: None,
            dehydrator_exit_time: None,
            ambient_temp_c: None,
            dehydrator_temp_c: None,
            package_count: None,
            package_size_g: None,
            status: ProductionStatus::Open,
            created_at: None,
            updated_at: None,
        };
        assert_eq!(p.yield_pct(), None);

        p.frozen_weight_kg = Some(10.0);
        assert_eq!(p.yield_pct(), None);

        p.final_weight_kg = Some(3.5);
        assert_eq!(p.yield_pct(), Some(35.0));

        p.frozen_weight_kg = Some(0.0);
        assert_eq!(p.yield_pct(), None);
    }
}
