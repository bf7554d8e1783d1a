//! SiteHost Server — static site deployment platform
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use sitehost_api::state::AppState;
use sitehost_core::config::AppConfig;
use sitehost_core::error::AppError;
use sitehost_database::repositories::deployment::DeploymentRepository;
use sitehost_service::DeploymentService;
use sitehost_storage::StaticResolver;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}

/// Load configuration from file and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("SITEHOST_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting SiteHost v{}", env!("CARGO_PKG_VERSION"));

    create_data_directories(&config).await?;

    tracing::info!("Connecting to database...");
    let db_pool = sitehost_database::connection::create_pool(&config.database).await?;

    tracing::info!("Running database migrations...");
    sitehost_database::migration::run_migrations(&db_pool).await?;
    tracing::info!("Database migrations complete");

    let deployment_repo = Arc::new(DeploymentRepository::new(db_pool));
    let deployment_service = Arc::new(DeploymentService::new(
        Arc::clone(&deployment_repo),
        &config.storage,
    ));
    let resolver = Arc::new(StaticResolver::new(&config.storage.deployments_root));

    let state = AppState {
        config: Arc::new(config.clone()),
        deployment_service,
        resolver,
    };

    let app = sitehost_api::build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("SiteHost server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_signal().await;
            tracing::info!("Shutdown signal received, starting graceful shutdown...");
        })
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    tracing::info!("SiteHost server shut down gracefully");
    Ok(())
}

/// Create required data directories
async fn create_data_directories(config: &AppConfig) -> Result<(), AppError> {
    tokio::fs::create_dir_all(&config.storage.deployments_root)
        .await
        .map_err(|e| AppError::internal(format!("Failed to create deployments directory: {e}")))?;

    // The SQLite file lives inside a directory that must exist before
    // the pool opens it.
    if let Some(path) = config.database.url.strip_prefix("sqlite://") {
        if let Some(parent) = std::path::Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    AppError::internal(format!("Failed to create database directory: {e}"))
                })?;
            }
        }
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
