use pawmill_core::{
    docstore, new_id, now_rfc3339, AccountSettings, ListParams, ListResult, OwnerId, ServiceError,
};
use pawmill_sql::Value;
use serde::Serialize;
use tracing::{info, warn};

use crate::model::Ingredient;
use crate::supplier::{SupplierClient, SupplierProduct};
use super::InventoryService;

pub struct CreateIngredientInput {
    pub name: String,
    pub unit: String,
    pub current_stock: f64,
    pub min_stock: f64,
    pub max_stock: f64,
    pub cost_per_unit: f64,
    pub supplier: Option<String>,
    pub supplier_sku: Option<String>,
}

/// Aggregate numbers for the inventory dashboard.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryStats {
    pub ingredient_count: usize,
    pub low_count: usize,
    /// Σ current_stock × cost_per_unit.
    pub stock_value: f64,
}

impl InventoryService {
    pub fn create_ingredient(
        &self,
        owner: &OwnerId,
        input: CreateIngredientInput,
    ) -> Result<Ingredient, ServiceError> {
        if input.name.trim().is_empty() {
            return Err(ServiceError::Validation("ingredient name is required".into()));
        }
        if input.current_stock < 0.0 || input.min_stock < 0.0 || input.max_stock < 0.0 {
            return Err(ServiceError::Validation("stock levels cannot be negative".into()));
        }

        let id = new_id();
        let now = now_rfc3339();
        let record = Ingredient {
            id: id.clone(),
            name: input.name.clone(),
            unit: input.unit,
            current_stock: input.current_stock,
            min_stock: input.min_stock,
            max_stock: input.max_stock,
            cost_per_unit: input.cost_per_unit,
            supplier: input.supplier.clone(),
            supplier_sku: input.supplier_sku,
            created_at: Some(now.clone()),
            updated_at: Some(now.clone()),
        };

        docstore::insert(self.sql.as_ref(), "ingredients", owner, &id, &record, &[
            ("name", Value::Text(input.name)),
            ("supplier", match input.supplier {
                Some(s) => Value::Text(s),
                None => Value::Null,
            }),
            ("created_at", Value::Text(now.clone())),
            ("updated_at", Value::Text(now)),
        ])?;

        Ok(record)
    }

    pub fn get_ingredient(&self, owner: &OwnerId, id: &str) -> Result<Ingredient, ServiceError> {
        docstore::get(self.sql.as_ref(), "ingredients", owner, id)
    }

    pub fn list_ingredients(
        &self,
        owner: &OwnerId,
        params: &ListParams,
    ) -> Result<ListResult<Ingredient>, ServiceError> {
        let limit = params.limit.min(500);
        if let Some(q) = params.q.as_deref().filter(|q| !q.trim().is_empty()) {
            return docstore::search(
                self.sql.as_ref(),
                "ingredients",
                owner,
                "name",
                q.trim(),
                "created_at",
                limit,
                params.offset,
            );
        }
        docstore::list(
            self.sql.as_ref(),
            "ingredients",
            owner,
            &[],
            "created_at",
            limit,
            params.offset,
        )
    }

    /// Merge-patch update. Stock fields are patchable here for corrections,
    /// but routine quantity changes should go through `adjust_stock` so the
    /// ledger stays meaningful.
    pub fn update_ingredient(
        &self,
        owner: &OwnerId,
        id: &str,
        patch: serde_json::Value,
    ) -> Result<Ingredient, ServiceError> {
        let current: Ingredient = docstore::get(self.sql.as_ref(), "ingredients", owner, id)?;
        let updated: Ingredient = docstore::apply_patch(&current, patch)?;
        if updated.current_stock < 0.0 {
            return Err(ServiceError::Validation("stock cannot go negative".into()));
        }

        self.persist_ingredient(owner, id, &updated)?;
        Ok(updated)
    }

    pub fn delete_ingredient(&self, owner: &OwnerId, id: &str) -> Result<(), ServiceError> {
        docstore::delete(self.sql.as_ref(), "ingredients", owner, id)
    }

    /// All ingredients at or below their minimum (boundary inclusive).
    pub fn low_stock(&self, owner: &OwnerId) -> Result<Vec<Ingredient>, ServiceError> {
        Ok(self
            .all_ingredients(owner)?
            .into_iter()
            .filter(Ingredient::is_low)
            .collect())
    }

    pub fn stats(&self, owner: &OwnerId) -> Result<InventoryStats, ServiceError> {
        let all = self.all_ingredients(owner)?;
        Ok(InventoryStats {
            ingredient_count: all.len(),
            low_count: all.iter().filter(|i| i.is_low()).count(),
            stock_value: all.iter().map(|i| i.current_stock * i.cost_per_unit).sum(),
        })
    }

    /// Accounts that have at least one ingredient. Drives the monitor scan.
    pub fn owners(&self) -> Result<Vec<OwnerId>, ServiceError> {
        docstore::owners(self.sql.as_ref(), "ingredients")
    }

    /// Push an ingredient's current stock to the external supplier system.
    /// Disabled (Ok(false)) unless the account has supplier settings and the
    /// ingredient carries a SKU. An Integration error here never rolls back
    /// the local stock that triggered the sync; the two systems may diverge
    /// until the next successful push.
    pub fn sync_ingredient(&self, owner: &OwnerId, id: &str) -> Result<bool, ServiceError> {
        let ingredient = self.get_ingredient(owner, id)?;
        let Some(sku) = ingredient.supplier_sku.as_deref() else {
            return Ok(false);
        };

        let settings = AccountSettings::load(self.kv.as_ref(), owner)?;
        let Some(client) = SupplierClient::from_settings(&settings) else {
            return Ok(false);
        };

        client.push_stock(sku, ingredient.current_stock).map_err(|e| {
            warn!(owner = %owner, ingredient = id, error = %e, "supplier sync failed");
            e
        })?;
        info!(owner = %owner, ingredient = id, sku, "stock pushed to supplier");
        Ok(true)
    }

    /// The supplier's record for an ingredient's SKU, for comparing remote
    /// stock against ours. Unlike `sync_ingredient`, a read with nothing to
    /// look up is an error rather than a silent no-op.
    pub fn supplier_product(
        &self,
        owner: &OwnerId,
        id: &str,
    ) -> Result<SupplierProduct, ServiceError> {
        let ingredient = self.get_ingredient(owner, id)?;
        let Some(sku) = ingredient.supplier_sku.as_deref() else {
            return Err(ServiceError::Validation("ingredient has no supplier SKU".into()));
        };

        let settings = AccountSettings::load(self.kv.as_ref(), owner)?;
        let Some(client) = SupplierClient::from_settings(&settings) else {
            return Err(ServiceError::Validation(
                "supplier integration is not configured".into(),
            ));
        };
        client.lookup_sku(sku)
    }

    pub(crate) fn persist_ingredient(
        &self,
        owner: &OwnerId,
        id: &str,
        record: &Ingredient,
    ) -> Result<(), ServiceError> {
        docstore::update(self.sql.as_ref(), "ingredients", owner, id, record, &[
            ("name", Value::Text(record.name.clone())),
            ("supplier", match record.supplier.clone() {
                Some(s) => Value::Text(s),
                None => Value::Null,
            }),
            ("updated_at", Value::Text(record.updated_at.clone().unwrap_or_default())),
        ])
    }

    pub(crate) fn all_ingredients(&self, owner: &OwnerId) -> Result<Vec<Ingredient>, ServiceError> {
        let rows = self.sql.query(
            "SELECT data FROM ingredients WHERE owner_id = ?1 ORDER BY name",
            &[Value::Text(owner.0.clone())],
        )?;
        let mut out = Vec::with_capacity(rows.len());
        for row in &rows {
            let data = row
                .get_str("data")
                .ok_or_else(|| ServiceError::Internal("missing data column".into()))?;
            out.push(serde_json::from_str(data).map_err(|e| ServiceError::Internal(e.to_string()))?);
        }
        Ok(out)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::service::testutil;

    pub(crate) fn input(name: &str, current: f64, min: f64) -> CreateIngredientInput {
        CreateIngredientInput {
            name: name.into(),
            unit: "kg".into(),
            current_stock: current,
            min_stock: min,
            max_stock: 100.0,
            cost_per_unit: 10.0,
            supplier: None,
            supplier_sku: None,
        }
    }

    #[test]
    fn low_stock_boundary_is_inclusive() {
        let (svc, _dir) = testutil::service();
        let owner = OwnerId::from("acct1");

        svc.create_ingredient(&owner, input("At minimum", 5.0, 5.0)).unwrap();
        svc.create_ingredient(&owner, input("Just under", 4.99, 5.0)).unwrap();
        svc.create_ingredient(&owner, input("Healthy", 50.0, 5.0)).unwrap();

        let low = svc.low_stock(&owner).unwrap();
        let names: Vec<_> = low.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["At minimum", "Just under"]);
    }

    #[test]
    fn list_with_q_searches_by_name() {
        let (svc, _dir) = testutil::service();
        let owner = OwnerId::from("acct1");

        for name in ["Chicken breast", "Chicken liver", "Beef heart"] {
            svc.create_ingredient(&owner, input(name, 10.0, 2.0)).unwrap();
        }

        let params = ListParams { q: Some("chicken".into()), ..Default::default() };
        let hits = svc.list_ingredients(&owner, &params).unwrap();
        assert_eq!(hits.total, 2);
        assert!(hits.items.iter().all(|i| i.name.starts_with("Chicken")));
    }

    #[test]
    fn stats_aggregates() {
        let (svc, _dir) = testutil::service();
        let owner = OwnerId::from("acct1");

        svc.create_ingredient(&owner, input("A", 10.0, 20.0)).unwrap();
        svc.create_ingredient(&owner, input("B", 4.0, 2.0)).unwrap();

        let stats = svc.stats(&owner).unwrap();
        assert_eq!(stats.ingredient_count, 2);
        assert_eq!(stats.low_count, 1);
        assert!((stats.stock_value - 140.0).abs() < 1e-9);
    }

    #[test]
    fn sync_disabled_without_configuration() {
        let (svc, _dir) = testutil::service();
        let owner = OwnerId::from("acct1");

        // No SKU on the ingredient: disabled regardless of settings.
        let plain = svc.create_ingredient(&owner, input("A", 10.0, 2.0)).unwrap();
        assert!(!svc.sync_ingredient(&owner, &plain.id).unwrap());

        // SKU present but no supplier settings stored: still disabled.
        let mut with_sku = input("B", 10.0, 2.0);
        with_sku.supplier_sku = Some("SKU-1".into());
        let b = svc.create_ingredient(&owner, with_sku).unwrap();
        assert!(!svc.sync_ingredient(&owner, &b.id).unwrap());
    }

    #[test]
    fn supplier_lookup_errors_when_unavailable() {
        let (svc, _dir) = testutil::service();
        let owner = OwnerId::from("acct1");

        let plain = svc.create_ingredient(&owner, input("A", 10.0, 2.0)).unwrap();
        assert!(matches!(
            svc.supplier_product(&owner, &plain.id),
            Err(ServiceError::Validation(_))
        ));

        let mut with_sku = input("B", 10.0, 2.0);
        with_sku.supplier_sku = Some("SKU-1".into());
        let b = svc.create_ingredient(&owner, with_sku).unwrap();
        assert!(matches!(
            svc.supplier_product(&owner, &b.id),
            Err(ServiceError::Validation(_))
        ));
    }

    #[test]
    fn negative_levels_rejected() {
        let (svc, _dir) = testutil::service();
        let owner = OwnerId::from("acct1");
        assert!(matches!(
            svc.create_ingredient(&owner, input("A", -1.0, 2.0)),
            Err(ServiceError::Validation(_))
        ));

        let a = svc.create_ingredient(&owner, input("A", 5.0, 2.0)).unwrap();
        assert!(matches!(
            svc.update_ingredient(&owner, &a.id, serde_json::json!({"currentStock": -3.0})),
            Err(ServiceError::Validation(_))
        ));
    }
}
