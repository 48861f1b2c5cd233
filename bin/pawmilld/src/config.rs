//! Server configuration.
//!
//! Reads a TOML file resolved from `-c <name-or-path>`: a bare name maps to
//! `/etc/pawmill/<name>.toml`, anything containing a `/` or `.` is used as a
//! path directly.

use std::path::{Path, PathBuf};

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub storage: StorageConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub monitor: MonitorSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the SQLite database and the settings KV file.
    pub data_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    /// HMAC secret for validating bearer tokens. Token issuance is
    /// external; this server only verifies.
    pub secret: String,
}

/// Background monitor settings. Intervals fall back to the built-in cadence
/// when not set.
#[derive(Debug, Clone, Deserialize)]
pub struct MonitorSection {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    pub stock_interval_secs: Option<u64>,
    pub stock_initial_delay_secs: Option<u64>,
    pub expiry_interval_secs: Option<u64>,
}

impl Default for MonitorSection {
    fn default() -> Self {
        Self {
            enabled: true,
            stock_interval_secs: None,
            stock_initial_delay_secs: None,
            expiry_interval_secs: None,
        }
    }
}

fn default_enabled() -> bool {
    true
}

impl ServerConfig {
    /// Resolve a config argument to a file path.
    pub fn resolve_path(arg: &str) -> PathBuf {
        if arg.contains('/') || arg.contains('.') {
            PathBuf::from(arg)
        } else {
            PathBuf::from(format!("/etc/pawmill/{arg}.toml"))
        }
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("cannot read {}: {}", path.display(), e))?;
        let config: ServerConfig = toml::from_str(&content)?;
        Ok(config)
    }
}

/// Refuse to start with a configuration that cannot work.
pub fn verify_config(config: &ServerConfig) -> anyhow::Result<()> {
    if config.jwt.secret.is_empty() {
        anyhow::bail!("JWT secret is empty in configuration.");
    }
    if config.storage.data_dir.is_empty() {
        anyhow::bail!("Storage data_dir is empty in configuration.");
    }
    Ok(())
}
