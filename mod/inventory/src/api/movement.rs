use axum::{
    Router,
    extract::{Path, Query, State},
    routing::{get, post},
    Json,
};
use serde::{Deserialize, Serialize};

use pawmill_core::{ListParams, ListResult, OwnerId, ServiceError};

use crate::model::{IngredientView, InventoryMovement, MovementType};
use crate::service::movement::{AdjustStock, MovementFilters};
use super::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/ingredients/{id}/adjust", post(adjust_stock))
        .route("/movements", get(list_movements))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AdjustStockBody {
    movement_type: MovementType,
    quantity: f64,
    production_id: Option<String>,
    note: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AdjustStockResponse {
    ingredient: IngredientView,
    movement: InventoryMovement,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MovementQuery {
    #[serde(flatten)]
    params: ListParams,
    ingredient_id: Option<String>,
    production_id: Option<String>,
}

async fn adjust_stock(
    State(svc): State<AppState>,
    owner: OwnerId,
    Path(id): Path<String>,
    Json(body): Json<AdjustStockBody>,
) -> Result<Json<AdjustStockResponse>, ServiceError> {
    let (ingredient, movement) = svc.adjust_stock(&owner, &id, AdjustStock {
        movement_type: body.movement_type,
        quantity: body.quantity,
        production_id: body.production_id,
        note: body.note,
    })?;
    Ok(Json(AdjustStockResponse {
        ingredient: ingredient.into(),
        movement,
    }))
}

async fn list_movements(
    State(svc): State<AppState>,
    owner: OwnerId,
    Query(q): Query<MovementQuery>,
) -> Result<Json<ListResult<InventoryMovement>>, ServiceError> {
    let filters = MovementFilters {
        ingredient_id: q.ingredient_id,
        production_id: q.production_id,
    };
    svc.list_movements(&owner, &q.params, &filters).map(Json)
}
