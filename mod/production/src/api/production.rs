use axum::{
    Router,
    extract::{Path, Query, State},
    routing::{get, post},
    Json,
};
use serde::Deserialize;

use pawmill_core::{ListParams, ListResult, OwnerId, ServiceError};

use crate::model::{ProductionStatus, ProductionView};
use crate::service::production::{CreateProductionInput, ProductionFilters, ProductionStats};
use super::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/productions", post(create_production).get(list_productions))
        .route("/productions/stats", get(stats))
        .route(
            "/productions/{id}",
            get(get_production).patch(update_production).delete(delete_production),
        )
        .route("/productions/{id}/start", post(start_production))
        .route("/productions/{id}/finish", post(finish_production))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateProductionBody {
    batch_code: String,
    product_id: Option<String>,
    protein: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductionQuery {
    #[serde(flatten)]
    params: ListParams,
    status: Option<ProductionStatus>,
    product_id: Option<String>,
}

async fn create_production(
    State(svc): State<AppState>,
    owner: OwnerId,
    Json(body): Json<CreateProductionBody>,
) -> Result<Json<ProductionView>, ServiceError> {
    svc.create_production(&owner, CreateProductionInput {
        batch_code: body.batch_code,
        product_id: body.product_id,
        protein: body.protein,
    })
    .map(|p| Json(p.into()))
}

async fn get_production(
    State(svc): State<AppState>,
    owner: OwnerId,
    Path(id): Path<String>,
) -> Result<Json<ProductionView>, ServiceError> {
    svc.get_production(&owner, &id).map(|p| Json(p.into()))
}

async fn list_productions(
    State(svc): State<AppState>,
    owner: OwnerId,
    Query(query): Query<ProductionQuery>,
) -> Result<Json<ListResult<ProductionView>>, ServiceError> {
    let filters = ProductionFilters {
        status: query.status,
        product_id: query.product_id,
    };
    let page = svc.list_productions(&owner, &query.params, &filters)?;
    Ok(Json(ListResult {
        total: page.total,
        items: page.items.into_iter().map(ProductionView::from).collect(),
    }))
}

async fn update_production(
    State(svc): State<AppState>,
    owner: OwnerId,
    Path(id): Path<String>,
    Json(patch): Json<serde_json::Value>,
) -> Result<Json<ProductionView>, ServiceError> {
    svc.update_production(&owner, &id, patch).map(|p| Json(p.into()))
}

async fn delete_production(
    State(svc): State<AppState>,
    owner: OwnerId,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    svc.delete_production(&owner, &id)?;
    Ok(Json(serde_json::json!({"ok": true})))
}

async fn start_production(
    State(svc): State<AppState>,
    owner: OwnerId,
    Path(id): Path<String>,
) -> Result<Json<ProductionView>, ServiceError> {
    svc.start_production(&owner, &id).map(|p| Json(p.into()))
}

async fn finish_production(
    State(svc): State<AppState>,
    owner: OwnerId,
    Path(id): Path<String>,
) -> Result<Json<ProductionView>, ServiceError> {
    svc.finish_production(&owner, &id).map(|p| Json(p.into()))
}

async fn stats(
    State(svc): State<AppState>,
    owner: OwnerId,
) -> Result<Json<ProductionStats>, ServiceError> {
    svc.production_stats(&owner).map(Json)
}
