use axum::{
    Router,
    extract::{Path, Query, State},
    routing::{get, post},
    Json,
};
use serde::Deserialize;

use pawmill_core::{ListParams, ListResult, OwnerId, ServiceError};

use crate::model::Pet;
use crate::service::pet::{CreatePetInput, PetFilters};
use super::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/pets", post(create_pet).get(list_pets))
        .route("/pets/{id}", get(get_pet).patch(update_pet).delete(delete_pet))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatePetBody {
    client_id: String,
    name: String,
    species: String,
    breed: Option<String>,
    birth_date: Option<String>,
    weight_kg: Option<f64>,
    food_notes: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PetQuery {
    #[serde(flatten)]
    params: ListParams,
    client_id: Option<String>,
}

async fn create_pet(
    State(svc): State<AppState>,
    owner: OwnerId,
    Json(body): Json<CreatePetBody>,
) -> Result<Json<Pet>, ServiceError> {
    svc.create_pet(&owner, CreatePetInput {
        client_id: body.client_id,
        name: body.name,
        species: body.species,
        breed: body.breed,
        birth_date: body.birth_date,
        weight_kg: body.weight_kg,
        food_notes: body.food_notes,
    })
    .map(Json)
}

async fn get_pet(
    State(svc): State<AppState>,
    owner: OwnerId,
    Path(id): Path<String>,
) -> Result<Json<Pet>, ServiceError> {
    svc.get_pet(&owner, &id).map(Json)
}

async fn list_pets(
    State(svc): State<AppState>,
    owner: OwnerId,
    Query(q): Query<PetQuery>,
) -> Result<Json<ListResult<Pet>>, ServiceError> {
    let filters = PetFilters {
        client_id: q.client_id,
    };
    svc.list_pets(&owner, &q.params, &filters).map(Json)
}

async fn update_pet(
    State(svc): State<AppState>,
    owner: OwnerId,
    Path(id): Path<String>,
    Json(patch): Json<serde_json::Value>,
) -> Result<Json<Pet>, ServiceError> {
    svc.update_pet(&owner, &id, patch).map(Json)
}

async fn delete_pet(
    State(svc): State<AppState>,
    owner: OwnerId,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    svc.delete_pet(&owner, &id)?;
    Ok(Json(serde_json::json!({"ok": true})))
}
