use axum::{
    Router,
    extract::{Path, Query, State},
    routing::{get, post},
    Json,
};
use serde::Deserialize;

use pawmill_core::{ListParams, ListResult, OwnerId, ServiceError};

use crate::model::{Menu, MenuItem};
use crate::service::menu::{CreateMenuInput, MenuFilters};
use super::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/menus", post(create_menu).get(list_menus))
        .route("/menus/{id}", get(get_menu).patch(update_menu).delete(delete_menu))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateMenuBody {
    client_id: String,
    name: String,
    #[serde(default)]
    items: Vec<MenuItem>,
    daily_portion_g: Option<f64>,
    notes: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MenuQuery {
    #[serde(flatten)]
    params: ListParams,
    client_id: Option<String>,
}

async fn create_menu(
    State(svc): State<AppState>,
    owner: OwnerId,
    Json(body): Json<CreateMenuBody>,
) -> Result<Json<Menu>, ServiceError> {
    svc.create_menu(&owner, CreateMenuInput {
        client_id: body.client_id,
        name: body.name,
        items: body.items,
        daily_portion_g: body.daily_portion_g,
        notes: body.notes,
    })
    .map(Json)
}

async fn get_menu(
    State(svc): State<AppState>,
    owner: OwnerId,
    Path(id): Path<String>,
) -> Result<Json<Menu>, ServiceError> {
    svc.get_menu(&owner, &id).map(Json)
}

async fn list_menus(
    State(svc): State<AppState>,
    owner: OwnerId,
    Query(q): Query<MenuQuery>,
) -> Result<Json<ListResult<Menu>>, ServiceError> {
    let filters = MenuFilters {
        client_id: q.client_id,
    };
    svc.list_menus(&owner, &q.params, &filters).map(Json)
}

async fn update_menu(
    State(svc): State<AppState>,
    owner: OwnerId,
    Path(id): Path<String>,
    Json(patch): Json<serde_json::Value>,
) -> Result<Json<Menu>, ServiceError> {
    svc.update_menu(&owner, &id, patch).map(Json)
}

async fn delete_menu(
    State(svc): State<AppState>,
    owner: OwnerId,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    svc.delete_menu(&owner, &id)?;
    Ok(Json(serde_json::json!({"ok": true})))
}
