use std::path::PathBuf;

/// Common storage/listen configuration shared by the server binary.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Directory holding all persistent data.
    pub data_dir: Option<PathBuf>,

    /// Path to the SQLite database file.
    /// Defaults to `{data_dir}/data.sqlite` if not specified.
    pub db_path: Option<PathBuf>,

    /// Path to the redb key-value file (per-account settings overrides).
    /// Defaults to `{data_dir}/settings.redb` if not specified.
    pub kv_path: Option<PathBuf>,

    /// Listen address for the HTTP server.
    pub listen: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            db_path: None,
            kv_path: None,
            listen: "0.0.0.0:8080".to_string(),
        }
    }
}

impl ServiceConfig {
    /// Resolve the SQLite path, falling back to `{data_dir}/data.sqlite`.
    pub fn resolve_db_path(&self) -> PathBuf {
        self.db_path
            .clone()
            .unwrap_or_else(|| self.resolve_data_subpath("data.sqlite"))
    }

    /// Resolve the redb path, falling back to `{data_dir}/settings.redb`.
    pub fn resolve_kv_path(&self) -> PathBuf {
        self.kv_path
            .clone()
            .unwrap_or_else(|| self.resolve_data_subpath("settings.redb"))
    }

    fn resolve_data_subpath(&self, name: &str) -> PathBuf {
        self.data_dir
            .as_ref()
            .map(|d| d.join(name))
            .unwrap_or_else(|| PathBuf::from(name))
    }
}
