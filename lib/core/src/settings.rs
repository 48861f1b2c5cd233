use std::collections::HashMap;

use pawmill_kv::KVStore;
use serde::{Deserialize, Serialize};

use crate::error::ServiceError;
use crate::owner::OwnerId;
use crate::types::merge_patch;

/// Per-account settings: compiled-in defaults merged with stored overrides.
///
/// Loaded once per consumer (service construction, scheduler tick) and passed
/// by reference — never re-read mid-operation. Only the overrides are
/// persisted, at `settings:{owner_id}` in the KV layer, so new defaults apply
/// to accounts that never touched a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccountSettings {
    /// Standard labels within this many days of expiry are "expiring".
    pub label_expiring_window_days: i64,

    /// Sanitary labels within this many hours of expiry are "expiring".
    pub sanitary_expiring_window_hours: i64,

    /// Supplier inventory API endpoint, e.g. "https://stock.example.com/api".
    pub supplier_api_base_url: String,

    /// Supplier API basic-auth username.
    pub supplier_api_username: String,

    /// Supplier API basic-auth password.
    pub supplier_api_password: String,
}

impl Default for AccountSettings {
    fn default() -> Self {
        Self {
            label_expiring_window_days: 7,
            sanitary_expiring_window_hours: 24,
            supplier_api_base_url: String::new(),
            supplier_api_username: String::new(),
            supplier_api_password: String::new(),
        }
    }
}

/// Namespace under which per-account overrides are stored.
const SETTINGS_PREFIX: &str = "settings:";

/// KV key holding an account's settings overrides.
pub fn settings_key(owner: &OwnerId) -> String {
    format!("{SETTINGS_PREFIX}{owner}")
}

impl AccountSettings {
    /// Whether the supplier inventory integration is enabled for this
    /// account: all three supplier fields must be non-empty.
    pub fn supplier_configured(&self) -> bool {
        !self.supplier_api_base_url.is_empty()
            && !self.supplier_api_username.is_empty()
            && !self.supplier_api_password.is_empty()
    }

    /// Defaults merged with one account's override document.
    fn merged(overrides: &serde_json::Value) -> Result<Self, ServiceError> {
        let mut effective = serde_json::to_value(Self::default())
            .map_err(|e| ServiceError::Internal(e.to_string()))?;
        merge_patch(&mut effective, overrides);
        serde_json::from_value(effective).map_err(|e| ServiceError::Internal(e.to_string()))
    }

    /// Load effective settings: defaults merged with stored overrides.
    pub fn load(kv: &dyn KVStore, owner: &OwnerId) -> Result<Self, ServiceError> {
        match kv.get(&settings_key(owner))? {
            Some(bytes) => {
                let overrides: serde_json::Value = serde_json::from_slice(&bytes)
                    .map_err(|e| ServiceError::Storage(format!("bad settings json: {e}")))?;
                Self::merged(&overrides)
            }
            None => Ok(Self::default()),
        }
    }

    /// Effective settings for every account that stored overrides, keyed by
    /// account id. Accounts absent from the map run on pure defaults. One KV
    /// scan; the scheduler uses this instead of a point read per account.
    pub fn load_overridden(kv: &dyn KVStore) -> Result<HashMap<String, Self>, ServiceError> {
        let mut out = HashMap::new();
        for (key, bytes) in kv.scan(SETTINGS_PREFIX)? {
            let Some(owner) = key.strip_prefix(SETTINGS_PREFIX) else {
                continue;
            };
            let overrides: serde_json::Value = serde_json::from_slice(&bytes)
                .map_err(|e| ServiceError::Storage(format!("bad settings json: {e}")))?;
            out.insert(owner.to_string(), Self::merged(&overrides)?);
        }
        Ok(out)
    }

    /// Merge `patch` into the stored overrides and return the new effective
    /// settings. Unknown keys are rejected rather than silently stored.
    pub fn save_overrides(
        kv: &dyn KVStore,
        owner: &OwnerId,
        patch: &serde_json::Value,
    ) -> Result<Self, ServiceError> {
        let obj = patch
            .as_object()
            .ok_or_else(|| ServiceError::Validation("settings patch must be an object".into()))?;

        let known = serde_json::to_value(Self::default())
            .map_err(|e| ServiceError::Internal(e.to_string()))?;
        for key in obj.keys() {
            if known.get(key).is_none() {
                return Err(ServiceError::Validation(format!("unknown setting '{key}'")));
            }
        }

        let key = settings_key(owner);
        let mut overrides: serde_json::Value = match kv.get(&key)? {
            Some(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| ServiceError::Storage(format!("bad settings json: {e}")))?,
            None => serde_json::json!({}),
        };
        merge_patch(&mut overrides, patch);

        let bytes = serde_json::to_vec(&overrides)
            .map_err(|e| ServiceError::Internal(e.to_string()))?;
        kv.set(&key, &bytes)?;

        Self::load(kv, owner)
    }
}
