use pawmill_core::{docstore, new_id, now_rfc3339, ListParams, ListResult, OwnerId, ServiceError};
use pawmill_sql::Value;
use tracing::info;

use crate::model::Client;
use super::ClientsService;

pub struct CreateClientInput {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

impl ClientsService {
    pub fn create_client(
        &self,
        owner: &OwnerId,
        input: CreateClientInput,
    ) -> Result<Client, ServiceError> {
        if input.name.trim().is_empty() {
            return Err(ServiceError::Validation("client name is required".into()));
        }

        let id = new_id();
        let now = now_rfc3339();
        let record = Client {
            id: id.clone(),
            name: input.name.clone(),
            email: input.email,
            phone: input.phone,
            address: input.address,
            notes: input.notes,
            created_at: Some(now.clone()),
            updated_at: Some(now.clone()),
        };

        docstore::insert(self.sql.as_ref(), "clients", owner, &id, &record, &[
            ("name", Value::Text(input.name)),
            ("created_at", Value::Text(now.clone())),
            ("updated_at", Value::Text(now)),
        ])?;

        Ok(record)
    }

    pub fn get_client(&self, owner: &OwnerId, id: &str) -> Result<Client, ServiceError> {
        docstore::get(self.sql.as_ref(), "clients", owner, id)
    }

    pub fn list_clients(
        &self,
        owner: &OwnerId,
        params: &ListParams,
    ) -> Result<ListResult<Client>, ServiceError> {
        let limit = params.limit.min(500);
        if let Some(q) = params.q.as_deref().filter(|q| !q.trim().is_empty()) {
            return docstore::search(
                self.sql.as_ref(), "clients", owner, "name", q.trim(), "created_at", limit, params.offset,
            );
        }
        docstore::list(self.sql.as_ref(), "clients", owner, &[], "created_at", limit, params.offset)
    }

    pub fn update_client(
        &self,
        owner: &OwnerId,
        id: &str,
        patch: serde_json::Value,
    ) -> Result<Client, ServiceError> {
        let current: Client = docstore::get(self.sql.as_ref(), "clients", owner, id)?;
        let updated: Client = docstore::apply_patch(&current, patch)?;
        if updated.name.trim().is_empty() {
            return Err(ServiceError::Validation("client name is required".into()));
        }

        docstore::update(self.sql.as_ref(), "clients", owner, id, &updated, &[
            ("name", Value::Text(updated.name.clone())),
            ("updated_at", Value::Text(updated.updated_at.clone().unwrap_or_default())),
        ])?;

        Ok(updated)
    }

    /// Delete a client together with its pets and menus. The child deletes
    /// are separate statements, not one transaction; a failure in between
    /// leaves the client intact with some children already gone.
    pub fn delete_client(&self, owner: &OwnerId, id: &str) -> Result<(), ServiceError> {
        let _: Client = docstore::get(self.sql.as_ref(), "clients", owner, id)?;

        let mut dependents = 0;
        for table in ["pets", "menus"] {
            let stmt = format!("DELETE FROM {table} WHERE owner_id = ?1 AND client_id = ?2");
            dependents += self
                .sql
                .exec(&stmt, &[Value::Text(owner.0.clone()), Value::Text(id.to_string())])?;
        }
        docstore::delete(self.sql.as_ref(), "clients", owner, id)?;
        if dependents > 0 {
            info!(owner = %owner, client = id, dependents, "client deleted with dependents");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::testutil;

    fn input(name: &str) -> CreateClientInput {
        CreateClientInput {
            name: name.into(),
            email: None,
            phone: None,
            address: None,
            notes: None,
        }
    }

    #[test]
    fn create_get_update_delete() {
        let svc = testutil::service();
        let owner = OwnerId::from("acct1");

        let c = svc.create_client(&owner, input("Maria")).unwrap();
        assert_eq!(svc.get_client(&owner, &c.id).unwrap().name, "Maria");

        let updated = svc
            .update_client(&owner, &c.id, serde_json::json!({"phone": "+55 11 99999-0000"}))
            .unwrap();
        assert_eq!(updated.phone.as_deref(), Some("+55 11 99999-0000"));
        assert_eq!(updated.name, "Maria");

        svc.delete_client(&owner, &c.id).unwrap();
        assert!(matches!(
            svc.get_client(&owner, &c.id),
            Err(ServiceError::NotFound(_))
        ));
    }

    #[test]
    fn empty_name_rejected() {
        let svc = testutil::service();
        let owner = OwnerId::from("acct1");
        assert!(matches!(
            svc.create_client(&owner, input("  ")),
            Err(ServiceError::Validation(_))
        ));
    }

    #[test]
    fn list_with_q_searches_by_name() {
        let svc = testutil::service();
        let owner = OwnerId::from("acct1");
        for name in ["Maria Silva", "Mariana Costa", "Pedro Alves"] {
            svc.create_client(&owner, input(name)).unwrap();
        }

        let params = ListParams { q: Some("maria".into()), ..Default::default() };
        let hits = svc.list_clients(&owner, &params).unwrap();
        assert_eq!(hits.total, 2);
        assert!(hits.items.iter().all(|c| c.name.starts_with("Maria")));

        // Blank q falls back to a plain list.
        let blank = ListParams { q: Some("   ".into()), ..Default::default() };
        assert_eq!(svc.list_clients(&owner, &blank).unwrap().total, 3);
    }

    #[test]
    fn clients_are_owner_isolated() {
        let svc = testutil::service();
        let alice = OwnerId::from("alice");
        let bob = OwnerId::from("bob");

        let c = svc.create_client(&alice, input("Maria")).unwrap();

        assert!(svc.get_client(&bob, &c.id).is_err());
        assert!(svc
            .update_client(&bob, &c.id, serde_json::json!({"name": "X"}))
            .is_err());
        assert!(svc.delete_client(&bob, &c.id).is_err());
        assert_eq!(svc.list_clients(&bob, &ListParams::default()).unwrap().total, 0);

        // Still intact for the real owner.
        assert_eq!(svc.get_client(&alice, &c.id).unwrap().name, "Maria");
    }

    #[test]
    fn delete_cascades_pets_and_menus() {
        let svc = testutil::service();
        let owner = OwnerId::from("acct1");

        let c = svc.create_client(&owner, input("Maria")).unwrap();
        let pet = svc
            .create_pet(&owner, crate::service::pet::CreatePetInput {
                client_id: c.id.clone(),
                name: "Rex".into(),
                species: "dog".into(),
                breed: None,
                birth_date: None,
                weight_kg: Some(28.0),
                food_notes: None,
            })
            .unwrap();
        let menu = svc
            .create_menu(&owner, crate::service::menu::CreateMenuInput {
                client_id: c.id.clone(),
                name: "Rex weekly".into(),
                items: vec![],
                daily_portion_g: None,
                notes: None,
            })
            .unwrap();

        svc.delete_client(&owner, &c.id).unwrap();

        assert!(svc.get_pet(&owner, &pet.id).is_err());
        assert!(svc.get_menu(&owner, &menu.id).is_err());
    }
}
