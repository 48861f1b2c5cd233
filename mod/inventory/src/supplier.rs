//! HTTP client for the external supplier inventory API.
//!
//! Basic-auth REST: look a product up by SKU, push a new stock quantity.
//! Requests are synchronous (ureq); callers run them via
//! `tokio::task::spawn_blocking` when on the async runtime.

use std::time::Duration;

use base64::prelude::*;
use serde::{Deserialize, Serialize};

use pawmill_core::{AccountSettings, ServiceError};

/// Remote product record, as the supplier API returns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierProduct {
    pub sku: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub quantity: f64,
}

pub struct SupplierClient {
    base_url: String,
    authorization: String,
    agent: ureq::Agent,
}

impl SupplierClient {
    /// Build a client from account settings. Returns None unless all three
    /// supplier fields are set; absence of configuration disables the
    /// integration entirely.
    pub fn from_settings(settings: &AccountSettings) -> Option<Self> {
        if !settings.supplier_configured() {
            return None;
        }
        let credentials = format!(
            "{}:{}",
            settings.supplier_api_username, settings.supplier_api_password
        );
        Some(Self {
            base_url: settings.supplier_api_base_url.trim_end_matches('/').to_string(),
            authorization: format!("Basic {}", BASE64_STANDARD.encode(credentials)),
            agent: ureq::AgentBuilder::new()
                .timeout(Duration::from_secs(10))
                .build(),
        })
    }

    /// GET a product by SKU.
    pub fn lookup_sku(&self, sku: &str) -> Result<SupplierProduct, ServiceError> {
        let url = format!("{}/products/{}", self.base_url, sku);
        let resp = self
            .agent
            .get(&url)
            .set("Authorization", &self.authorization)
            .call()
            .map_err(integration_error)?;
        resp.into_json()
            .map_err(|e| ServiceError::Integration(format!("supplier response: {e}")))
    }

    /// PUT a new stock quantity for a SKU.
    pub fn push_stock(&self, sku: &str, quantity: f64) -> Result<(), ServiceError> {
        let url = format!("{}/products/{}/stock", self.base_url, sku);
        self.agent
            .put(&url)
            .set("Authorization", &self.authorization)
            .send_json(serde_json::json!({ "quantity": quantity }))
            .map_err(integration_error)?;
        Ok(())
    }
}

fn integration_error(e: ureq::Error) -> ServiceError {
    match e {
        ureq::Error::Status(code, _) => {
            ServiceError::Integration(format!("supplier API returned {code}"))
        }
        ureq::Error::Transport(t) => ServiceError::Integration(format!("supplier API: {t}")),
    }
}
