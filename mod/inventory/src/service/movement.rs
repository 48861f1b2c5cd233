use pawmill_core::{docstore, new_id, now_rfc3339, ListParams, ListResult, OwnerId, ServiceError};
use pawmill_sql::Value;

use crate::model::{Ingredient, InventoryMovement, MovementType};
use super::InventoryService;

pub struct AdjustStock {
    pub movement_type: MovementType,
    pub quantity: f64,
    pub production_id: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Default)]
pub struct MovementFilters {
    pub ingredient_id: Option<String>,
    pub production_id: Option<String>,
}

impl InventoryService {
    /// Adjust an ingredient's stock and append one ledger entry.
    ///
    /// Subtracting more than the current stock is rejected up front: neither
    /// the ingredient nor the ledger is touched. The ingredient update and
    /// the ledger append are two statements, not a transaction; on a ledger
    /// write failure the stock change has already landed.
    pub fn adjust_stock(
        &self,
        owner: &OwnerId,
        ingredient_id: &str,
        input: AdjustStock,
    ) -> Result<(Ingredient, InventoryMovement), ServiceError> {
        if !input.quantity.is_finite() || input.quantity <= 0.0 {
            return Err(ServiceError::Validation(format!(
                "adjustment quantity must be positive, got {}",
                input.quantity
            )));
        }

        let mut ingredient: Ingredient =
            docstore::get(self.sql.as_ref(), "ingredients", owner, ingredient_id)?;

        ingredient.current_stock = match input.movement_type {
            MovementType::In => ingredient.current_stock + input.quantity,
            MovementType::Out => {
                if input.quantity > ingredient.current_stock {
                    return Err(ServiceError::Validation(format!(
                        "insufficient stock: have {} {}, subtracting {}",
                        ingredient.current_stock, ingredient.unit, input.quantity
                    )));
                }
                ingredient.current_stock - input.quantity
            }
        };
        let now = now_rfc3339();
        ingredient.updated_at = Some(now.clone());
        self.persist_ingredient(owner, ingredient_id, &ingredient)?;

        let id = new_id();
        let movement = InventoryMovement {
            id: id.clone(),
            ingredient_id: ingredient_id.to_string(),
            movement_type: input.movement_type,
            quantity: input.quantity,
            production_id: input.production_id.clone(),
            note: input.note,
            created_at: Some(now.clone()),
        };

        docstore::insert(self.sql.as_ref(), "inventory_movements", owner, &id, &movement, &[
            ("ingredient_id", Value::Text(ingredient_id.to_string())),
            ("movement_type", Value::Text(input.movement_type.as_str().to_string())),
            ("production_id", match input.production_id {
                Some(p) => Value::Text(p),
                None => Value::Null,
            }),
            ("created_at", Value::Text(now)),
        ])?;

        Ok((ingredient, movement))
    }

    /// The ledger, newest first. No update or delete exists for movements.
    pub fn list_movements(
        &self,
        owner: &OwnerId,
        params: &ListParams,
        filters: &MovementFilters,
    ) -> Result<ListResult<InventoryMovement>, ServiceError> {
        let limit = params.limit.min(500);
        let mut f: Vec<(&str, Value)> = Vec::new();
        if let Some(ref i) = filters.ingredient_id {
            f.push(("ingredient_id", Value::Text(i.clone())));
        }
        if let Some(ref p) = filters.production_id {
            f.push(("production_id", Value::Text(p.clone())));
        }
        docstore::list(
            self.sql.as_ref(),
            "inventory_movements",
            owner,
            &f,
            "created_at",
            limit,
            params.offset,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::ingredient::tests::input;
    use crate::service::testutil;

    fn adjust(t: MovementType, q: f64) -> AdjustStock {
        AdjustStock {
            movement_type: t,
            quantity: q,
            production_id: None,
            note: None,
        }
    }

    #[test]
    fn in_and_out_update_stock_and_ledger() {
        let (svc, _dir) = testutil::service();
        let owner = OwnerId::from("acct1");
        let ing = svc.create_ingredient(&owner, input("Chicken", 10.0, 2.0)).unwrap();

        let (after_in, _) = svc
            .adjust_stock(&owner, &ing.id, adjust(MovementType::In, 5.0))
            .unwrap();
        assert!((after_in.current_stock - 15.0).abs() < 1e-9);

        let (after_out, mv) = svc
            .adjust_stock(&owner, &ing.id, adjust(MovementType::Out, 3.5))
            .unwrap();
        assert!((after_out.current_stock - 11.5).abs() < 1e-9);
        assert_eq!(mv.movement_type, MovementType::Out);
        assert!(mv.quantity > 0.0);

        let ledger = svc
            .list_movements(&owner, &ListParams::default(), &MovementFilters {
                ingredient_id: Some(ing.id.clone()),
                production_id: None,
            })
            .unwrap();
        assert_eq!(ledger.total, 2);
    }

    #[test]
    fn over_subtraction_fails_without_writes() {
        let (svc, _dir) = testutil::service();
        let owner = OwnerId::from("acct1");
        let ing = svc.create_ingredient(&owner, input("Chicken", 10.0, 2.0)).unwrap();

        let err = svc
            .adjust_stock(&owner, &ing.id, adjust(MovementType::Out, 10.01))
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        // No mutation and no ledger entry.
        let unchanged = svc.get_ingredient(&owner, &ing.id).unwrap();
        assert!((unchanged.current_stock - 10.0).abs() < 1e-9);
        let ledger = svc
            .list_movements(&owner, &ListParams::default(), &MovementFilters::default())
            .unwrap();
        assert_eq!(ledger.total, 0);
    }

    #[test]
    fn subtracting_exactly_current_stock_is_allowed() {
        let (svc, _dir) = testutil::service();
        let owner = OwnerId::from("acct1");
        let ing = svc.create_ingredient(&owner, input("Chicken", 10.0, 2.0)).unwrap();

        let (after, _) = svc
            .adjust_stock(&owner, &ing.id, adjust(MovementType::Out, 10.0))
            .unwrap();
        assert_eq!(after.current_stock, 0.0);
    }

    #[test]
    fn zero_and_negative_quantities_rejected() {
        let (svc, _dir) = testutil::service();
        let owner = OwnerId::from("acct1");
        let ing = svc.create_ingredient(&owner, input("Chicken", 10.0, 2.0)).unwrap();

        for q in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(svc
                .adjust_stock(&owner, &ing.id, adjust(MovementType::In, q))
                .is_err());
        }
    }
}
