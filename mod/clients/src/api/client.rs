use axum::{
    Router,
    extract::{Path, Query, State},
    routing::{get, post},
    Json,
};
use serde::Deserialize;

use pawmill_core::{ListParams, ListResult, OwnerId, ServiceError};

use crate::model::Client;
use crate::service::client::CreateClientInput;
use super::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/clients", post(create_client).get(list_clients))
        .route(
            "/clients/{id}",
            get(get_client).patch(update_client).delete(delete_client),
        )
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateClientBody {
    name: String,
    email: Option<String>,
    phone: Option<String>,
    address: Option<String>,
    notes: Option<String>,
}

async fn create_client(
    State(svc): State<AppState>,
    owner: OwnerId,
    Json(body): Json<CreateClientBody>,
) -> Result<Json<Client>, ServiceError> {
    svc.create_client(&owner, CreateClientInput {
        name: body.name,
        email: body.email,
        phone: body.phone,
        address: body.address,
        notes: body.notes,
    })
    .map(Json)
}

async fn get_client(
    State(svc): State<AppState>,
    owner: OwnerId,
    Path(id): Path<String>,
) -> Result<Json<Client>, ServiceError> {
    svc.get_client(&owner, &id).map(Json)
}

async fn list_clients(
    State(svc): State<AppState>,
    owner: OwnerId,
    Query(params): Query<ListParams>,
) -> Result<Json<ListResult<Client>>, ServiceError> {
    svc.list_clients(&owner, &params).map(Json)
}

async fn update_client(
    State(svc): State<AppState>,
    owner: OwnerId,
    Path(id): Path<String>,
    Json(patch): Json<serde_json::Value>,
) -> Result<Json<Client>, ServiceError> {
    svc.update_client(&owner, &id, patch).map(Json)
}

async fn delete_client(
    State(svc): State<AppState>,
    owner: OwnerId,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    svc.delete_client(&owner, &id)?;
    Ok(Json(serde_json::json!({"ok": true})))
}
