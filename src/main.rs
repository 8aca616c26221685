//! Jury - Application Entry Point

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use jury::{
    build_router,
    config::{Config, LogFormat, StorageBackend},
    db::{self, MemoryStore, PgStore, Store},
    scheduler::ExpiryScheduler,
    services::RubricService,
    state::AppState,
    utils::SystemClock,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.server.rust_log.clone().into());
    let registry = tracing_subscriber::registry().with(filter);
    match config.server.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }

    tracing::info!("Starting Jury server...");

    let store: Arc<dyn Store> = match config.storage.backend {
        StorageBackend::Postgres => {
            tracing::info!("Connecting to database...");
            let pool = db::create_pool(&config.database).await?;

            tracing::info!("Running database migrations...");
            db::run_migrations(&pool).await?;

            Arc::new(PgStore::new(pool))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    let state = AppState::new(store, Arc::new(SystemClock), config.clone());

    if config.storage.seed_preset_rubric {
        let rubric = RubricService::ensure_preset(&state).await?;
        tracing::info!(model_id = %rubric.id(), "Preset rubric available");
    }

    let scheduler = config.scheduler.expiry_sweep_enabled.then(|| {
        ExpiryScheduler::new(state.clone(), config.scheduler.expiry_sweep_interval()).spawn()
    });

    let app = build_router(state);

    // Start the server
    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(scheduler) = scheduler {
        scheduler.shutdown().await;
    }
    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
