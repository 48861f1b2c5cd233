use pawmill_core::{docstore, new_id, now_rfc3339, ListParams, ListResult, OwnerId, ServiceError};
use pawmill_sql::Value;

use crate::model::{Client, Pet};
use super::ClientsService;

pub struct CreatePetInput {
    pub client_id: String,
    pub name: String,
    pub species: String,
    pub breed: Option<String>,
    pub birth_date: Option<String>,
    pub weight_kg: Option<f64>,
    pub food_notes: Option<String>,
}

#[derive(Debug, Default)]
pub struct PetFilters {
    pub client_id: Option<String>,
}

impl ClientsService {
    pub fn create_pet(&self, owner: &OwnerId, input: CreatePetInput) -> Result<Pet, ServiceError> {
        if input.name.trim().is_empty() {
            return Err(ServiceError::Validation("pet name is required".into()));
        }
        // The referenced client must belong to the same account.
        let _: Client = docstore::get(self.sql.as_ref(), "clients", owner, &input.client_id)?;

        let id = new_id();
        let now = now_rfc3339();
        let record = Pet {
            id: id.clone(),
            client_id: input.client_id.clone(),
            name: input.name.clone(),
            species: input.species,
            breed: input.breed,
            birth_date: input.birth_date,
            weight_kg: input.weight_kg,
            food_notes: input.food_notes,
            created_at: Some(now.clone()),
            updated_at: Some(now.clone()),
        };

        docstore::insert(self.sql.as_ref(), "pets", owner, &id, &record, &[
            ("client_id", Value::Text(input.client_id)),
            ("name", Value::Text(input.name)),
            ("created_at", Value::Text(now.clone())),
            ("updated_at", Value::Text(now)),
        ])?;

        Ok(record)
    }

    pub fn get_pet(&self, owner: &OwnerId, id: &str) -> Result<Pet, ServiceError> {
        docstore::get(self.sql.as_ref(), "pets", owner, id)
    }

    pub fn list_pets(
        &self,
        owner: &OwnerId,
        params: &ListParams,
        filters: &PetFilters,
    ) -> Result<ListResult<Pet>, ServiceError> {
        let limit = params.limit.min(500);
        let mut f: Vec<(&str, Value)> = Vec::new();
        if let Some(ref c) = filters.client_id {
            f.push(("client_id", Value::Text(c.clone())));
        }
        docstore::list(self.sql.as_ref(), "pets", owner, &f, "created_at", limit, params.offset)
    }

    pub fn update_pet(
        &self,
        owner: &OwnerId,
        id: &str,
        patch: serde_json::Value,
    ) -> Result<Pet, ServiceError> {
        let current: Pet = docstore::get(self.sql.as_ref(), "pets", owner, id)?;
        let updated: Pet = docstore::apply_patch(&current, patch)?;
        if updated.client_id != current.client_id {
            // Re-homing a pet is allowed, but only to a client of the same account.
            let _: Client = docstore::get(self.sql.as_ref(), "clients", owner, &updated.client_id)?;
        }

        docstore::update(self.sql.as_ref(), "pets", owner, id, &updated, &[
            ("client_id", Value::Text(updated.client_id.clone())),
            ("name", Value::Text(updated.name.clone())),
            ("updated_at", Value::Text(updated.updated_at.clone().unwrap_or_default())),
        ])?;

        Ok(updated)
    }

    pub fn delete_pet(&self, owner: &OwnerId, id: &str) -> Result<(), ServiceError> {
        docstore::delete(self.sql.as_ref(), "pets", owner, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::client::CreateClientInput;
    use crate::service::testutil;

    fn client(svc: &ClientsService, owner: &OwnerId) -> Client {
        svc.create_client(owner, CreateClientInput {
            name: "Maria".into(),
            email: None,
            phone: None,
            address: None,
            notes: None,
        })
        .unwrap()
    }

    fn pet_input(client_id: &str, name: &str) -> CreatePetInput {
        CreatePetInput {
            client_id: client_id.into(),
            name: name.into(),
            species: "dog".into(),
            breed: None,
            birth_date: None,
            weight_kg: None,
            food_notes: None,
        }
    }

    #[test]
    fn pet_requires_existing_client() {
        let svc = testutil::service();
        let owner = OwnerId::from("acct1");
        assert!(matches!(
            svc.create_pet(&owner, pet_input("nope", "Rex")),
            Err(ServiceError::NotFound(_))
        ));
    }

    #[test]
    fn pet_cannot_reference_another_owners_client() {
        let svc = testutil::service();
        let alice = OwnerId::from("alice");
        let bob = OwnerId::from("bob");
        let c = client(&svc, &alice);

        assert!(svc.create_pet(&bob, pet_input(&c.id, "Rex")).is_err());
    }

    #[test]
    fn list_pets_filters_by_client() {
        let svc = testutil::service();
        let owner = OwnerId::from("acct1");
        let c1 = client(&svc, &owner);
        let c2 = svc
            .create_client(&owner, CreateClientInput {
                name: "Jo".into(),
                email: None,
                phone: None,
                address: None,
                notes: None,
            })
            .unwrap();

        svc.create_pet(&owner, pet_input(&c1.id, "Rex")).unwrap();
        svc.create_pet(&owner, pet_input(&c1.id, "Bela")).unwrap();
        svc.create_pet(&owner, pet_input(&c2.id, "Mimi")).unwrap();

        let all = svc
            .list_pets(&owner, &ListParams::default(), &PetFilters::default())
            .unwrap();
        assert_eq!(all.total, 3);

        let only_c1 = svc
            .list_pets(&owner, &ListParams::default(), &PetFilters {
                client_id: Some(c1.id.clone()),
            })
            .unwrap();
        assert_eq!(only_c1.total, 2);
    }
}
