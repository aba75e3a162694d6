use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use nebula_core::{LevelCatalog, MemoryStore, ProgressStore};
use nebula_persistence::{SqlProgressStore, connection::connect_and_migrate};
use nebula_server::{
    config::{Config, StorageBackend},
    create_routes,
    service::NebulaService,
};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting Nebula progress server...");

    let config = match Config::new() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let catalog = match LevelCatalog::load_default() {
        Ok(catalog) => catalog,
        Err(e) => {
            error!("Failed to load level catalog: {}", e);
            std::process::exit(1);
        }
    };
    info!("Loaded {} levels", catalog.len());

    let store: Arc<dyn ProgressStore> = match config.storage_backend {
        StorageBackend::Sqlite => match connect_and_migrate(&config.database_url).await {
            Ok(db) => Arc::new(SqlProgressStore::new(db)),
            Err(e) => {
                error!("Failed to connect to database and run migrations: {}", e);
                std::process::exit(1);
            }
        },
        StorageBackend::Memory => {
            info!("Using in-memory storage, progress will not survive a restart");
            Arc::new(MemoryStore::new())
        }
    };

    let ip: IpAddr = match config.host.parse() {
        Ok(ip) => ip,
        Err(e) => {
            error!("Invalid HOST '{}': {}", config.host, e);
            std::process::exit(1);
        }
    };
    let addr = SocketAddr::new(ip, config.port);

    let service = Arc::new(NebulaService::new(store, catalog));
    let routes = create_routes(service, config);

    info!("Server starting on {}", addr);

    let (addr, server) =
        match warp::serve(routes).try_bind_with_graceful_shutdown(addr, shutdown_signal()) {
            Ok(bound) => bound,
            Err(e) => {
                error!("Failed to bind {}: {}", addr, e);
                std::process::exit(1);
            }
        };

    info!(
        "Server started successfully on {}. Press Ctrl+C to stop.",
        addr
    );
    server.await;
    info!("Server shutdown complete.");
}

/// Resolves on SIGINT (Ctrl+C) or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT, shutting down gracefully...");
        }
        _ = terminate => {
            info!("Received SIGTERM, shutting down gracefully...");
        }
    }
}
