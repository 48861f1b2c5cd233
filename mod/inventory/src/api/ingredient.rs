use axum::{
    Router,
    extract::{Path, Query, State},
    routing::{get, post},
    Json,
};
use serde::Deserialize;

use pawmill_core::{ListParams, ListResult, OwnerId, ServiceError};

use crate::model::IngredientView;
use crate::service::ingredient::{CreateIngredientInput, InventoryStats};
use crate::supplier::SupplierProduct;
use super::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/ingredients", post(create_ingredient).get(list_ingredients))
        .route("/ingredients/low", get(low_stock))
        .route(
            "/ingredients/{id}",
            get(get_ingredient).patch(update_ingredient).delete(delete_ingredient),
        )
        .route("/ingredients/{id}/sync", post(sync_ingredient))
        .route("/ingredients/{id}/supplier", get(supplier_product))
        .route("/stats", get(stats))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateIngredientBody {
    name: String,
    unit: String,
    #[serde(default)]
    current_stock: f64,
    #[serde(default)]
    min_stock: f64,
    #[serde(default)]
    max_stock: f64,
    #[serde(default)]
    cost_per_unit: f64,
    supplier: Option<String>,
    supplier_sku: Option<String>,
}

async fn create_ingredient(
    State(svc): State<AppState>,
    owner: OwnerId,
    Json(body): Json<CreateIngredientBody>,
) -> Result<Json<IngredientView>, ServiceError> {
    svc.create_ingredient(&owner, CreateIngredientInput {
        name: body.name,
        unit: body.unit,
        current_stock: body.current_stock,
        min_stock: body.min_stock,
        max_stock: body.max_stock,
        cost_per_unit: body.cost_per_unit,
        supplier: body.supplier,
        supplier_sku: body.supplier_sku,
    })
    .map(|i| Json(i.into()))
}

async fn get_ingredient(
    State(svc): State<AppState>,
    owner: OwnerId,
    Path(id): Path<String>,
) -> Result<Json<IngredientView>, ServiceError> {
    svc.get_ingredient(&owner, &id).map(|i| Json(i.into()))
}

async fn list_ingredients(
    State(svc): State<AppState>,
    owner: OwnerId,
    Query(params): Query<ListParams>,
) -> Result<Json<ListResult<IngredientView>>, ServiceError> {
    let page = svc.list_ingredients(&owner, &params)?;
    Ok(Json(ListResult {
        total: page.total,
        items: page.items.into_iter().map(IngredientView::from).collect(),
    }))
}

async fn low_stock(
    State(svc): State<AppState>,
    owner: OwnerId,
) -> Result<Json<Vec<IngredientView>>, ServiceError> {
    let low = svc.low_stock(&owner)?;
    Ok(Json(low.into_iter().map(IngredientView::from).collect()))
}

async fn update_ingredient(
    State(svc): State<AppState>,
    owner: OwnerId,
    Path(id): Path<String>,
    Json(patch): Json<serde_json::Value>,
) -> Result<Json<IngredientView>, ServiceError> {
    svc.update_ingredient(&owner, &id, patch).map(|i| Json(i.into()))
}

async fn delete_ingredient(
    State(svc): State<AppState>,
    owner: OwnerId,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    svc.delete_ingredient(&owner, &id)?;
    Ok(Json(serde_json::json!({"ok": true})))
}

/// Supplier calls block on network I/O, so they run off the async runtime.
async fn sync_ingredient(
    State(svc): State<AppState>,
    owner: OwnerId,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let synced = tokio::task::spawn_blocking(move || svc.sync_ingredient(&owner, &id))
        .await
        .map_err(|e| ServiceError::Internal(e.to_string()))??;
    Ok(Json(serde_json::json!({"synced": synced})))
}

async fn supplier_product(
    State(svc): State<AppState>,
    owner: OwnerId,
    Path(id): Path<String>,
) -> Result<Json<SupplierProduct>, ServiceError> {
    let product = tokio::task::spawn_blocking(move || svc.supplier_product(&owner, &id))
        .await
        .map_err(|e| ServiceError::Internal(e.to_string()))??;
    Ok(Json(product))
}

async fn stats(
    State(svc): State<AppState>,
    owner: OwnerId,
) -> Result<Json<InventoryStats>, ServiceError> {
    svc.stats(&owner).map(Json)
}
