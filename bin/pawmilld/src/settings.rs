//! Account settings endpoints.
//!
//! Settings are per account, not per server: they live in the KV store and
//! belong to the authenticated owner, so the routes sit here in the binary
//! next to the stores rather than in any one business module.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use pawmill_core::{AccountSettings, OwnerId, ServiceError};
use pawmill_kv::KVStore;

pub fn routes(kv: Arc<dyn KVStore>) -> Router {
    Router::new()
        .route("/settings/v1/settings", get(get_settings).patch(patch_settings))
        .with_state(kv)
}

async fn get_settings(
    State(kv): State<Arc<dyn KVStore>>,
    owner: OwnerId,
) -> Result<Json<AccountSettings>, ServiceError> {
    Ok(Json(AccountSettings::load(kv.as_ref(), &owner)?))
}

/// Merge-patch the stored overrides; returns the new effective settings.
async fn patch_settings(
    State(kv): State<Arc<dyn KVStore>>,
    owner: OwnerId,
    Json(patch): Json<serde_json::Value>,
) -> Result<Json<AccountSettings>, ServiceError> {
    Ok(Json(AccountSettings::save_overrides(kv.as_ref(), &owner, &patch)?))
}
