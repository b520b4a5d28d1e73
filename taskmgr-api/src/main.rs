//! # taskmgr API Server
//!
//! Multi-user task tracker over HTTP with bearer-token authentication and
//! role-gated routes.
//!
//! ## Usage
//!
//! ```bash
//! JWT_SECRET=$(openssl rand -hex 32) STORE_BACKEND=memory cargo run -p taskmgr-api
//! ```

use std::sync::Arc;

use taskmgr_api::{
    app::{build_router, AppState},
    config::{Config, StoreBackend},
};
use taskmgr_shared::{
    db::{migrations::run_migrations, pool::{create_pool, DatabaseConfig}},
    store::{
        memory::{MemoryTaskStore, MemoryUserStore},
        postgres::{PgTaskStore, PgUserStore},
        TaskStore, UserStore,
    },
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    tracing::info!(
        "taskmgr API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    let (user_store, task_store) = build_stores(&config).await?;
    let state = AppState::from_stores(user_store, task_store, config.clone())?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!(
        address = %config.bind_address(),
        store = config.store.as_str(),
        "Server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "taskmgr_api=debug,taskmgr_shared=debug,tower_http=debug".into());

    let json = std::env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn build_stores(
    config: &Config,
) -> anyhow::Result<(Arc<dyn UserStore>, Arc<dyn TaskStore>)> {
    match config.store {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; data is lost on restart");
            Ok((
                Arc::new(MemoryUserStore::new()),
                Arc::new(MemoryTaskStore::new()),
            ))
        }
        StoreBackend::Postgres => {
            let database = config
                .database
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

            let pool = create_pool(DatabaseConfig {
                url: database.url.clone(),
                max_connections: database.max_connections,
                ..Default::default()
            })
            .await?;

            run_migrations(&pool).await?;

            Ok((
                Arc::new(PgUserStore::new(pool.clone())),
                Arc::new(PgTaskStore::new(pool)),
            ))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        // Keep serving; the process can still be stopped externally
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, exiting...");
}
