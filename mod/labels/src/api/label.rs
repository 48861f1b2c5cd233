use axum::{
    Router,
    extract::{Path, Query, State},
    response::Html,
    routing::{get, post},
    Json,
};
use serde::Deserialize;

use pawmill_core::{ListParams, ListResult, OwnerId, ServiceError};

use crate::model::LabelView;
use crate::print;
use crate::service::label::{CreateLabelInput, LabelFilters};
use super::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/labels", post(create_label).get(list_labels))
        .route("/labels/expiring", get(expiring_labels))
        .route("/labels/expired", get(expired_labels))
        .route(
            "/labels/{id}",
            get(get_label).patch(update_label).delete(delete_label),
        )
        .route("/labels/{id}/printed", post(mark_printed))
        .route("/labels/{id}/print", get(print_label))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateLabelBody {
    product_name: String,
    batch_code: String,
    production_id: Option<String>,
    production_date: String,
    expiry_date: String,
    #[serde(default = "one")]
    quantity: u32,
}

fn one() -> u32 {
    1
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LabelQuery {
    #[serde(flatten)]
    params: ListParams,
    production_id: Option<String>,
    printed: Option<bool>,
}

async fn create_label(
    State(svc): State<AppState>,
    owner: OwnerId,
    Json(body): Json<CreateLabelBody>,
) -> Result<Json<LabelView>, ServiceError> {
    let label = svc.create_label(&owner, CreateLabelInput {
        product_name: body.product_name,
        batch_code: body.batch_code,
        production_id: body.production_id,
        production_date: body.production_date,
        expiry_date: body.expiry_date,
        quantity: body.quantity,
    })?;
    svc.label_view(&owner, label).map(Json)
}

async fn get_label(
    State(svc): State<AppState>,
    owner: OwnerId,
    Path(id): Path<String>,
) -> Result<Json<LabelView>, ServiceError> {
    let label = svc.get_label(&owner, &id)?;
    svc.label_view(&owner, label).map(Json)
}

async fn list_labels(
    State(svc): State<AppState>,
    owner: OwnerId,
    Query(q): Query<LabelQuery>,
) -> Result<Json<ListResult<LabelView>>, ServiceError> {
    let filters = LabelFilters {
        production_id: q.production_id,
        printed: q.printed,
    };
    let page = svc.list_labels(&owner, &q.params, &filters)?;
    let mut items = Vec::with_capacity(page.items.len());
    for label in page.items {
        items.push(svc.label_view(&owner, label)?);
    }
    Ok(Json(ListResult {
        items,
        total: page.total,
    }))
}

async fn expiring_labels(
    State(svc): State<AppState>,
    owner: OwnerId,
) -> Result<Json<Vec<LabelView>>, ServiceError> {
    svc.expiring_labels(&owner).map(Json)
}

async fn expired_labels(
    State(svc): State<AppState>,
    owner: OwnerId,
) -> Result<Json<Vec<LabelView>>, ServiceError> {
    svc.expired_labels(&owner).map(Json)
}

async fn update_label(
    State(svc): State<AppState>,
    owner: OwnerId,
    Path(id): Path<String>,
    Json(patch): Json<serde_json::Value>,
) -> Result<Json<LabelView>, ServiceError> {
    let label = svc.update_label(&owner, &id, patch)?;
    svc.label_view(&owner, label).map(Json)
}

async fn delete_label(
    State(svc): State<AppState>,
    owner: OwnerId,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    svc.delete_label(&owner, &id)?;
    Ok(Json(serde_json::json!({"ok": true})))
}

async fn mark_printed(
    State(svc): State<AppState>,
    owner: OwnerId,
    Path(id): Path<String>,
) -> Result<Json<LabelView>, ServiceError> {
    let label = svc.mark_label_printed(&owner, &id)?;
    svc.label_view(&owner, label).map(Json)
}

async fn print_label(
    State(svc): State<AppState>,
    owner: OwnerId,
    Path(id): Path<String>,
) -> Result<Html<String>, ServiceError> {
    let label = svc.get_label(&owner, &id)?;
    Ok(Html(print::render_label(&label)))
}
