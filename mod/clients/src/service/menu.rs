use pawmill_core::{docstore, new_id, now_rfc3339, ListParams, ListResult, OwnerId, ServiceError};
use pawmill_sql::Value;

use crate::model::{Client, Menu, MenuItem};
use super::ClientsService;

pub struct CreateMenuInput {
    pub client_id: String,
    pub name: String,
    pub items: Vec<MenuItem>,
    pub daily_portion_g: Option<f64>,
    pub notes: Option<String>,
}

#[derive(Debug, Default)]
pub struct MenuFilters {
    pub client_id: Option<String>,
}

fn check_items(items: &[MenuItem]) -> Result<(), ServiceError> {
    for item in items {
        if item.ingredient_id.trim().is_empty() {
            return Err(ServiceError::Validation("menu item missing ingredient".into()));
        }
        if item.quantity <= 0.0 {
            return Err(ServiceError::Validation(format!(
                "menu item quantity must be positive, got {}",
                item.quantity
            )));
        }
    }
    Ok(())
}

impl ClientsService {
    pub fn create_menu(&self, owner: &OwnerId, input: CreateMenuInput) -> Result<Menu, ServiceError> {
        if input.name.trim().is_empty() {
            return Err(ServiceError::Validation("menu name is required".into()));
        }
        check_items(&input.items)?;
        let _: Client = docstore::get(self.sql.as_ref(), "clients", owner, &input.client_id)?;

        let id = new_id();
        let now = now_rfc3339();
        let record = Menu {
            id: id.clone(),
            client_id: input.client_id.clone(),
            name: input.name.clone(),
            items: input.items,
            daily_portion_g: input.daily_portion_g,
            notes: input.notes,
            created_at: Some(now.clone()),
            updated_at: Some(now.clone()),
        };

        docstore::insert(self.sql.as_ref(), "menus", owner, &id, &record, &[
            ("client_id", Value::Text(input.client_id)),
            ("name", Value::Text(input.name)),
            ("created_at", Value::Text(now.clone())),
            ("updated_at", Value::Text(now)),
        ])?;

        Ok(record)
    }

    pub fn get_menu(&self, owner: &OwnerId, id: &str) -> Result<Menu, ServiceError> {
        docstore::get(self.sql.as_ref(), "menus", owner, id)
    }

    pub fn list_menus(
        &self,
        owner: &OwnerId,
        params: &ListParams,
        filters: &MenuFilters,
    ) -> Result<ListResult<Menu>, ServiceError> {
        let limit = params.limit.min(500);
        let mut f: Vec<(&str, Value)> = Vec::new();
        if let Some(ref c) = filters.client_id {
            f.push(("client_id", Value::Text(c.clone())));
        }
        docstore::list(self.sql.as_ref(), "menus", owner, &f, "created_at", limit, params.offset)
    }

    pub fn update_menu(
        &self,
        owner: &OwnerId,
        id: &str,
        patch: serde_json::Value,
    ) -> Result<Menu, ServiceError> {
        let current: Menu = docstore::get(self.sql.as_ref(), "menus", owner, id)?;
        let updated: Menu = docstore::apply_patch(&current, patch)?;
        check_items(&updated.items)?;
        if updated.client_id != current.client_id {
            let _: Client = docstore::get(self.sql.as_ref(), "clients", owner, &updated.client_id)?;
        }

        docstore::update(self.sql.as_ref(), "menus", owner, id, &updated, &[
            ("client_id", Value::Text(updated.client_id.clone())),
            ("name", Value::Text(updated.name.clone())),
            ("updated_at", Value::Text(updated.updated_at.clone().unwrap_or_default())),
        ])?;

        Ok(updated)
    }

    pub fn delete_menu(&self, owner: &OwnerId, id: &str) -> Result<(), ServiceError> {
        docstore::delete(self.sql.as_ref(), "menus", owner, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::client::CreateClientInput;
    use crate::service::testutil;

    #[test]
    fn menu_item_validation() {
        let svc = testutil::service();
        let owner = OwnerId::from("acct1");
        let c = svc
            .create_client(&owner, CreateClientInput {
                name: "Maria".into(),
                email: None,
                phone: None,
                address: None,
                notes: None,
            })
            .unwrap();

        let bad = CreateMenuInput {
            client_id: c.id.clone(),
            name: "Rex weekly".into(),
            items: vec![MenuItem {
                ingredient_id: "ing001".into(),
                quantity: 0.0,
                unit: "kg".into(),
            }],
            daily_portion_g: None,
            notes: None,
        };
        assert!(matches!(
            svc.create_menu(&owner, bad),
            Err(ServiceError::Validation(_))
        ));

        let good = CreateMenuInput {
            client_id: c.id.clone(),
            name: "Rex weekly".into(),
            items: vec![MenuItem {
                ingredient_id: "ing001".into(),
                quantity: 1.5,
                unit: "kg".into(),
            }],
            daily_portion_g: Some(350.0),
            notes: None,
        };
        let m = svc.create_menu(&owner, good).unwrap();
        assert_eq!(m.items.len(), 1);

        // Patching items in wholesale replaces the embedded list.
        let updated = svc
            .update_menu(
                &owner,
                &m.id,
                serde_json::json!({"items": [
                    {"ingredientId": "ing001", "quantity": 1.0, "unit": "kg"},
                    {"ingredientId": "ing002", "quantity": 0.2, "unit": "kg"}
                ]}),
            )
            .unwrap();
        assert_eq!(updated.items.len(), 2);
    }
}
