//! Concord server: settings from env, storage per `STORAGE_BACKEND`, all routes under /api/v1.

use concord::notify::LogNotifier;
use concord::{app, ensure_database_exists, AppState, MemoryStore, PgStore, Registry, Settings, StorageBackend, Store};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("concord=info,concord_server=info,tower_http=info")),
        )
        .init();

    let settings = Settings::from_env()?;
    let registry = Registry::standard()?;

    let store: Arc<dyn Store> = match settings.storage {
        StorageBackend::Memory => {
            tracing::warn!("using in-memory storage; data is lost on exit");
            Arc::new(MemoryStore::new(registry))
        }
        StorageBackend::Postgres => {
            let database_url = settings.database_url.clone().unwrap_or_default();
            ensure_database_exists(&database_url).await?;
            let store = PgStore::connect(&database_url, settings.db_max_connections, registry).await?;
            store.migrate().await?;
            Arc::new(store)
        }
    };

    let bind_addr = settings.bind_addr.clone();
    let state = AppState::new(store, Arc::new(LogNotifier), settings);

    let listener = TcpListener::bind(&bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        return;
    }
    tracing::info!("shutting down");
}
