use serde::{Deserialize, Serialize};

/// Ingredient — a raw material with stock levels and thresholds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    /// UUID primary key.
    #[serde(default)]
    pub id: String,

    pub name: String,

    /// Stock unit (e.g. "kg", "unit").
    pub unit: String,

    /// Quantity on hand. Mutated only through stock adjustments.
    #[serde(default)]
    pub current_stock: f64,

    /// Reorder threshold. At or below this the ingredient counts as low.
    #[serde(default)]
    pub min_stock: f64,

    /// Capacity reference used for the stock percentage display.
    #[serde(default)]
    pub max_stock: f64,

    #[serde(default)]
    pub cost_per_unit: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,

    /// SKU in the external supplier system, required for push-sync.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier_sku: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Ingredient {
    /// Low-stock test, boundary inclusive: at exactly the minimum the
    /// ingredient is already low.
    pub fn is_low(&self) -> bool {
        self.current_stock <= self.min_stock
    }

    /// Stock as a percentage of `max_stock`, capped at 100. None when no
    /// meaningful maximum is set. Computed on read, never stored.
    pub fn stock_pct(&self) -> Option<f64> {
        if self.max_stock <= 0.0 {
            return None;
        }
        Some((self.current_stock / self.max_stock * 100.0).min(100.0))
    }
}

/// API view of an ingredient with the derived display fields attached.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientView {
    #[serde(flatten)]
    pub ingredient: Ingredient,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock_pct: Option<f64>,
    pub low: bool,
}

impl From<Ingredient> for IngredientView {
    fn from(ingredient: Ingredient) -> Self {
        let stock_pct = ingredient.stock_pct();
        let low = ingredient.is_low();
        Self {
            ingredient,
            stock_pct,
            low,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ingredient(current: f64, min: f64, max: f64) -> Ingredient {
        Ingredient {
            id: "ing001".into(),
            name: "Chicken breast".into(),
            unit: "kg".into(),
            current_stock: current,
            min_stock: min,
            max_stock: max,
            cost_per_unit: 18.5,
            supplier: None,
            supplier_sku: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn low_is_boundary_inclusive() {
        assert!(ingredient(5.0, 5.0, 50.0).is_low());
        assert!(ingredient(4.99, 5.0, 50.0).is_low());
        assert!(!ingredient(5.01, 5.0, 50.0).is_low());
    }

    #[test]
    fn stock_pct_caps_and_handles_zero_max() {
        assert_eq!(ingredient(25.0, 5.0, 50.0).stock_pct(), Some(50.0));
        assert_eq!(ingredient(80.0, 5.0, 50.0).stock_pct(), Some(100.0));
        assert_eq!(ingredient(25.0, 5.0, 0.0).stock_pct(), None);
    }
}
