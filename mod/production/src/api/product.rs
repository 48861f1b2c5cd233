use axum::{
    Router,
    extract::{Path, Query, State},
    routing::{get, post},
    Json,
};
use serde::Deserialize;

use pawmill_core::{ListParams, ListResult, OwnerId, ServiceError};

use crate::model::Product;
use crate::service::product::CreateProductInput;
use super::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products", post(create_product).get(list_products))
        .route(
            "/products/{id}",
            get(get_product).patch(update_product).delete(delete_product),
        )
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateProductBody {
    name: String,
    protein: Option<String>,
    shelf_life_days: Option<i64>,
    sanitary_shelf_life_hours: Option<i64>,
}

async fn create_product(
    State(svc): State<AppState>,
    owner: OwnerId,
    Json(body): Json<CreateProductBody>,
) -> Result<Json<Product>, ServiceError> {
    svc.create_product(&owner, CreateProductInput {
        name: body.name,
        protein: body.protein,
        shelf_life_days: body.shelf_life_days,
        sanitary_shelf_life_hours: body.sanitary_shelf_life_hours,
    })
    .map(Json)
}

async fn get_product(
    State(svc): State<AppState>,
    owner: OwnerId,
    Path(id): Path<String>,
) -> Result<Json<Product>, ServiceError> {
    svc.get_product(&owner, &id).map(Json)
}

async fn list_products(
    State(svc): State<AppState>,
    owner: OwnerId,
    Query(params): Query<ListParams>,
) -> Result<Json<ListResult<Product>>, ServiceError> {
    svc.list_products(&owner, &params).map(Json)
}

async fn update_product(
    State(svc): State<AppState>,
    owner: OwnerId,
    Path(id): Path<String>,
    Json(patch): Json<serde_json::Value>,
) -> Result<Json<Product>, ServiceError> {
    svc.update_product(&owner, &id, patch).map(Json)
}

async fn delete_product(
    State(svc): State<AppState>,
    owner: OwnerId,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    svc.delete_product(&owner, &id)?;
    Ok(Json(serde_json::json!({"ok": true})))
}
