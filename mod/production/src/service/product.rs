use pawmill_core::{docstore, new_id, now_rfc3339, ListParams, ListResult, OwnerId, ServiceError};
use pawmill_sql::Value;

use crate::model::Product;
use super::ProductionService;

pub struct CreateProductInput {
    pub name: String,
    pub protein: Option<String>,
    pub shelf_life_days: Option<i64>,
    pub sanitary_shelf_life_hours: Option<i64>,
}

impl ProductionService {
    pub fn create_product(
        &self,
        owner: &OwnerId,
        input: CreateProductInput,
    ) -> Result<Product, ServiceError> {
        if input.name.trim().is_empty() {
            return Err(ServiceError::Validation("product name is required".into()));
        }

        let id = new_id();
        let now = now_rfc3339();
        let record = Product {
            id: id.clone(),
            name: input.name.clone(),
            protein: input.protein.clone(),
            shelf_life_days: input.shelf_life_days,
            sanitary_shelf_life_hours: input.sanitary_shelf_life_hours,
            active: true,
            created_at: Some(now.clone()),
            updated_at: Some(now.clone()),
        };

        // Name uniqueness per account rides on the UNIQUE constraint; a
        // violation surfaces as Conflict.
        docstore::insert(self.sql.as_ref(), "products", owner, &id, &record, &[
            ("name", Value::Text(input.name)),
            ("protein", match input.protein {
                Some(p) => Value::Text(p),
                None => Value::Null,
            }),
            ("created_at", Value::Text(now.clone())),
            ("updated_at", Value::Text(now)),
        ])?;

        Ok(record)
    }

    pub fn get_product(&self, owner: &OwnerId, id: &str) -> Result<Product, ServiceError> {
        docstore::get(self.sql.as_ref(), "products", owner, id)
    }

    pub fn list_products(
        &self,
        owner: &OwnerId,
        params: &ListParams,
    ) -> Result<ListResult<Product>, ServiceError> {
        let limit = params.limit.min(500);
        docstore::list(self.sql.as_ref(), "products", owner, &[], "created_at", limit, params.offset)
    }

    pub fn update_product(
        &self,
        owner: &OwnerId,
        id: &str,
        patch: serde_json::Value,
    ) -> Result<Product, ServiceError> {
        let current: Product = docstore::get(self.sql.as_ref(), "products", owner, id)?;
        let updated: Product = docstore::apply_patch(&current, patch)?;
        if updated.name.trim().is_empty() {
            return Err(ServiceError::Validation("product name is required".into()));
        }

        docstore::update(self.sql.as_ref(), "products", owner, id, &updated, &[
            ("name", Value::Text(updated.name.clone())),
            ("protein", match updated.protein.clone() {
                Some(p) => Value::Text(p),
                None => Value::Null,
            }),
            ("updated_at", Value::Text(updated.updated_at.clone().unwrap_or_default())),
        ])?;

        Ok(updated)
    }

    pub fn delete_product(&self, owner: &OwnerId, id: &str) -> Result<(), ServiceError> {
        docstore::delete(self.sql.as_ref(), "products", owner, id)
    }
}
