use axum::{
    Router,
    extract::{Path, Query, State},
    routing::{get, post},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use pawmill_core::{ListParams, ListResult, OwnerId, ServiceError};

use crate::model::{Notification, NotificationKind};
use crate::service::notification::NewNotification;
use super::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/notifications", post(create_notification).get(list_notifications))
        .route("/notifications/unread-count", get(unread_count))
        .route("/notifications/read-all", post(mark_all_read))
        .route("/notifications/sweep", post(sweep))
        .route(
            "/notifications/{id}",
            get(get_notification).delete(delete_notification),
        )
        .route("/notifications/{id}/read", post(mark_read))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateNotificationBody {
    title: String,
    message: String,
    #[serde(default = "general")]
    kind: NotificationKind,
    related_id: Option<String>,
}

fn general() -> NotificationKind {
    NotificationKind::General
}

/// A same-day repeat is not an error: the write collapsed into an existing
/// row and the response says so.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateNotificationResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    notification: Option<Notification>,
    deduplicated: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NotificationQuery {
    #[serde(flatten)]
    params: ListParams,
    #[serde(default)]
    unread_only: bool,
}

async fn create_notification(
    State(svc): State<AppState>,
    owner: OwnerId,
    Json(body): Json<CreateNotificationBody>,
) -> Result<Json<CreateNotificationResponse>, ServiceError> {
    let created = svc.notify(&owner, NewNotification {
        kind: body.kind,
        title: body.title,
        message: body.message,
        related_id: body.related_id,
        variant: None,
    })?;
    let deduplicated = created.is_none();
    Ok(Json(CreateNotificationResponse {
        notification: created,
        deduplicated,
    }))
}

async fn list_notifications(
    State(svc): State<AppState>,
    owner: OwnerId,
    Query(query): Query<NotificationQuery>,
) -> Result<Json<ListResult<Notification>>, ServiceError> {
    Ok(Json(svc.list_notifications(&owner, &query.params, query.unread_only)?))
}

async fn unread_count(
    State(svc): State<AppState>,
    owner: OwnerId,
) -> Result<Json<Value>, ServiceError> {
    let count = svc.unread_count(&owner)?;
    Ok(Json(json!({ "count": count })))
}

async fn get_notification(
    State(svc): State<AppState>,
    owner: OwnerId,
    Path(id): Path<String>,
) -> Result<Json<Notification>, ServiceError> {
    Ok(Json(svc.get_notification(&owner, &id)?))
}

async fn mark_read(
    State(svc): State<AppState>,
    owner: OwnerId,
    Path(id): Path<String>,
) -> Result<Json<Notification>, ServiceError> {
    Ok(Json(svc.mark_read(&owner, &id)?))
}

async fn mark_all_read(
    State(svc): State<AppState>,
    owner: OwnerId,
) -> Result<Json<Value>, ServiceError> {
    let updated = svc.mark_all_read(&owner)?;
    Ok(Json(json!({ "updated": updated })))
}

async fn delete_notification(
    State(svc): State<AppState>,
    owner: OwnerId,
    Path(id): Path<String>,
) -> Result<Json<Value>, ServiceError> {
    svc.delete_notification(&owner, &id)?;
    Ok(Json(json!({ "ok": true })))
}

async fn sweep(
    State(svc): State<AppState>,
    owner: OwnerId,
) -> Result<Json<Value>, ServiceError> {
    let deleted = svc.dedup_sweep(&owner)?;
    Ok(Json(json!({ "deleted": deleted })))
}
