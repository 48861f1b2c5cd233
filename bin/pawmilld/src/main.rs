//! `pawmilld` — the pawmill server binary.
//!
//! Usage:
//!   pawmilld -c <config-name-or-path> [--listen <addr>]
//!
//! The config name resolves to `/etc/pawmill/<name>.toml`.
//! If a path with `/` or `.` is given, it's used directly.

mod auth_middleware;
mod config;
mod routes;
mod settings;

use std::sync::Arc;

use clap::Parser;
use jsonwebtoken::{DecodingKey, Validation};
use pawmill_core::Module;
use tokio_util::sync::CancellationToken;
use tracing::info;

use alerts::monitor::{self, MonitorConfig, MonitorDeps};
use auth_middleware::JwtState;
use config::ServerConfig;
use routes::AppState;

/// Pawmill server.
#[derive(Parser, Debug)]
#[command(name = "pawmilld", about = "Pawmill production-tracking server")]
struct Cli {
    /// Config name or path to config file.
    #[arg(short = 'c', long = "config", required = true)]
    config: String,

    /// Listen address (overrides default 0.0.0.0:8080).
    #[arg(long = "listen", default_value = "0.0.0.0:8080")]
    listen: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    // Load server configuration.
    let config_path = ServerConfig::resolve_path(&cli.config);
    info!("Loading configuration from {}", config_path.display());
    let server_config = ServerConfig::load(&config_path)?;
    config::verify_config(&server_config)?;

    // Initialize storage.
    let data_dir = std::path::PathBuf::from(&server_config.storage.data_dir);
    std::fs::create_dir_all(&data_dir)?;

    let core_config = pawmill_core::ServiceConfig {
        data_dir: Some(data_dir.clone()),
        listen: cli.listen.clone(),
        ..Default::default()
    };

    // Embedded stores, shared by all modules.
    let kv: Arc<dyn pawmill_kv::KVStore> = Arc::new(
        pawmill_kv::RedbStore::open(&core_config.resolve_kv_path())
            .map_err(|e| anyhow::anyhow!("failed to open KV store: {}", e))?,
    );
    let sql: Arc<dyn pawmill_sql::SQLStore> = Arc::new(
        pawmill_sql::SqliteStore::open(&core_config.resolve_db_path())
            .map_err(|e| anyhow::anyhow!("failed to open SQL store: {}", e))?,
    );

    // Services. Alerts comes first; production emits into its feed.
    let alerts_service = Arc::new(alerts::service::AlertsService::new(Arc::clone(&sql))?);
    let inventory_service = Arc::new(inventory::service::InventoryService::new(
        Arc::clone(&sql),
        Arc::clone(&kv),
    )?);
    let labels_service = Arc::new(labels::service::LabelsService::new(
        Arc::clone(&sql),
        Arc::clone(&kv),
    )?);
    let clients_service = Arc::new(clients::service::ClientsService::new(Arc::clone(&sql))?);
    let production_service = Arc::new(production::service::ProductionService::new(
        Arc::clone(&sql),
        Arc::clone(&alerts_service),
    )?);

    let modules: Vec<Box<dyn Module>> = vec![
        Box::new(clients::ClientsModule::new(Arc::clone(&clients_service))),
        Box::new(inventory::InventoryModule::new(Arc::clone(&inventory_service))),
        Box::new(labels::LabelsModule::new(Arc::clone(&labels_service))),
        Box::new(alerts::AlertsModule::new(Arc::clone(&alerts_service))),
        Box::new(production::ProductionModule::new(Arc::clone(&production_service))),
    ];

    let mut module_routes = Vec::with_capacity(modules.len());
    for module in &modules {
        info!("{} module initialized", module.name());
        module_routes.push(module.routes());
    }

    // Background monitors.
    let monitor_token = if server_config.monitor.enabled {
        let mut monitor_config = MonitorConfig::default();
        if let Some(v) = server_config.monitor.stock_interval_secs {
            monitor_config.stock_interval_secs = v;
        }
        if let Some(v) = server_config.monitor.stock_initial_delay_secs {
            monitor_config.stock_initial_delay_secs = v;
        }
        if let Some(v) = server_config.monitor.expiry_interval_secs {
            monitor_config.expiry_interval_secs = v;
        }
        Some(monitor::start(
            MonitorDeps {
                alerts: Arc::clone(&alerts_service),
                inventory: Arc::clone(&inventory_service),
                labels: Arc::clone(&labels_service),
                kv: Arc::clone(&kv),
            },
            monitor_config,
        ))
    } else {
        info!("monitors disabled by configuration");
        None
    };

    // JWT state for the middleware.
    let jwt_state = Arc::new(JwtState {
        decoding_key: DecodingKey::from_secret(server_config.jwt.secret.as_bytes()),
        validation: Validation::default(),
    });

    let app_state = AppState { jwt_state, kv };
    let app = routes::build_router(app_state, module_routes);

    // Start server.
    let listener = tokio::net::TcpListener::bind(&cli.listen).await?;
    info!("pawmilld listening on {}", cli.listen);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(monitor_token))
        .await?;

    Ok(())
}

/// Wait for ctrl-c, then stop the monitor scheduler before the server
/// drains its connections.
async fn shutdown_signal(monitor_token: Option<CancellationToken>) {
    if tokio::signal::ctrl_c().await.is_err() {
        return;
    }
    info!("shutdown signal received");
    if let Some(token) = monitor_token {
        token.cancel();
    }
}
