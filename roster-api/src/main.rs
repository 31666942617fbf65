//! # Roster API Server
//!
//! HTTP service managing users and tasks, with analytics views over the
//! user collection and background stamps on task writes.
//!
//! ## Startup
//!
//! 1. Load configuration from the environment (`.env` honoured)
//! 2. Open the store backend; for PostgreSQL, connect and check the pool,
//!    then apply pending migrations
//! 3. Spawn the side-effect worker
//! 4. Serve until Ctrl+C, then stop the worker and close the pool
//!
//! ## Usage
//!
//! ```bash
//! STORE_BACKEND=memory cargo run -p roster-api
//! ```

use anyhow::Context;
use roster_api::{
    app::{build_router, AppState},
    config::{Config, StoreBackend},
};
use roster_shared::{
    db::{migrations::run_migrations, pool},
    store::{MemoryStore, PgStore, Stores},
};
use roster_worker::queue::{side_effect_channel, WorkerConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "roster_api=debug,roster_worker=debug,roster_shared=info,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Roster API Server v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env().context("Failed to load configuration")?;

    let (stores, pg_pool) = match config.store.backend {
        StoreBackend::Postgres => {
            let pg_pool = pool::create_pool(config.store.database.clone())
                .await
                .context("Failed to connect to PostgreSQL")?;

            run_migrations(&pg_pool)
                .await
                .context("Failed to run database migrations")?;

            (Stores::new(PgStore::new(pg_pool.clone())), Some(pg_pool))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store, data is lost on shutdown");
            (Stores::new(MemoryStore::new()), None)
        }
    };

    tracing::info!(backend = stores.health.backend(), "Store ready");

    let (side_effects, worker) = side_effect_channel(
        stores.tasks.clone(),
        WorkerConfig {
            completion_delay: config.worker.completion_delay,
        },
    );
    let worker_shutdown = worker.shutdown_token();
    let worker_handle = tokio::spawn(worker.run());

    let bind_address = config.bind_address();
    let app = build_router(AppState::new(stores, side_effects, config));

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;

    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    worker_shutdown.cancel();
    if let Err(e) = worker_handle.await {
        tracing::error!(error = %e, "Side-effect worker panicked");
    }

    if let Some(pg_pool) = pg_pool {
        pool::close_pool(pg_pool).await;
    }

    tracing::info!("Shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
