use axum::{
    Router,
    extract::{Path, Query, State},
    response::Html,
    routing::{get, post},
    Json,
};
use serde::Deserialize;

use pawmill_core::{ListParams, ListResult, OwnerId, ServiceError};

use crate::model::SanitaryLabelView;
use crate::print;
use crate::service::sanitary::CreateSanitaryLabelInput;
use super::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/sanitary", post(create_label).get(list_labels))
        .route("/sanitary/expiring", get(expiring))
        .route("/sanitary/expired", get(expired))
        .route(
            "/sanitary/{id}",
            get(get_label).patch(update_label).delete(delete_label),
        )
        .route("/sanitary/{id}/printed", post(mark_printed))
        .route("/sanitary/{id}/print", get(print_label))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateSanitaryBody {
    product_name: String,
    batch_code: Option<String>,
    prepared_at: String,
    expiry_at: String,
    responsible: String,
}

async fn create_label(
    State(svc): State<AppState>,
    owner: OwnerId,
    Json(body): Json<CreateSanitaryBody>,
) -> Result<Json<SanitaryLabelView>, ServiceError> {
    let label = svc.create_sanitary_label(&owner, CreateSanitaryLabelInput {
        product_name: body.product_name,
        batch_code: body.batch_code,
        prepared_at: body.prepared_at,
        expiry_at: body.expiry_at,
        responsible: body.responsible,
    })?;
    svc.sanitary_view(&owner, label).map(Json)
}

async fn get_label(
    State(svc): State<AppState>,
    owner: OwnerId,
    Path(id): Path<String>,
) -> Result<Json<SanitaryLabelView>, ServiceError> {
    let label = svc.get_sanitary_label(&owner, &id)?;
    svc.sanitary_view(&owner, label).map(Json)
}

async fn list_labels(
    State(svc): State<AppState>,
    owner: OwnerId,
    Query(params): Query<ListParams>,
) -> Result<Json<ListResult<SanitaryLabelView>>, ServiceError> {
    let page = svc.list_sanitary_labels(&owner, &params)?;
    let mut items = Vec::with_capacity(page.items.len());
    for label in page.items {
        items.push(svc.sanitary_view(&owner, label)?);
    }
    Ok(Json(ListResult {
        items,
        total: page.total,
    }))
}

async fn expiring(
    State(svc): State<AppState>,
    owner: OwnerId,
) -> Result<Json<Vec<SanitaryLabelView>>, ServiceError> {
    svc.expiring_sanitary(&owner).map(Json)
}

async fn expired(
    State(svc): State<AppState>,
    owner: OwnerId,
) -> Result<Json<Vec<SanitaryLabelView>>, ServiceError> {
    svc.expired_sanitary(&owner).map(Json)
}

async fn update_label(
    State(svc): State<AppState>,
    owner: OwnerId,
    Path(id): Path<String>,
    Json(patch): Json<serde_json::Value>,
) -> Result<Json<SanitaryLabelView>, ServiceError> {
    let label = svc.update_sanitary_label(&owner, &id, patch)?;
    svc.sanitary_view(&owner, label).map(Json)
}

async fn delete_label(
    State(svc): State<AppState>,
    owner: OwnerId,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    svc.delete_sanitary_label(&owner, &id)?;
    Ok(Json(serde_json::json!({"ok": true})))
}

async fn mark_printed(
    State(svc): State<AppState>,
    owner: OwnerId,
    Path(id): Path<String>,
) -> Result<Json<SanitaryLabelView>, ServiceError> {
    let label = svc.mark_sanitary_printed(&owner, &id)?;
    svc.sanitary_view(&owner, label).map(Json)
}

async fn print_label(
    State(svc): State<AppState>,
    owner: OwnerId,
    Path(id): Path<String>,
) -> Result<Html<String>, ServiceError> {
    let label = svc.get_sanitary_label(&owner, &id)?;
    Ok(Html(print::render_sanitary_label(&label)))
}
