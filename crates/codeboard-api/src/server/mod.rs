//! Server setup and initialization
//!
//! Provides the main application builder, the history pruner and the server runner.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use codeboard_common::{AppConfig, AppError, StorageBackend};
use codeboard_db::{create_pool, MemoryBoardStore, PgBoardStore, PoolConfig};
use codeboard_service::{QuotaService, ServiceContext, ServiceContextBuilder};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

use crate::middleware::apply_middleware_with_config;
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
///
/// Health routes sit outside the rate limiter.
pub fn create_app(state: AppState) -> Result<Router, AppError> {
    let config = state.config();
    let api = apply_middleware_with_config(
        create_router(),
        &config.rate_limit,
        &config.cors,
        config.app.env.is_production(),
    )?;

    Ok(api.merge(health_routes()).with_state(state))
}

/// Initialize the configured storage backend and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    let builder = ServiceContextBuilder::new()
        .policy(config.board.policy)
        .list_cache_ttl(config.board.list_cache_ttl);

    let builder = match config.storage.backend {
        StorageBackend::Memory => {
            warn!("Using in-memory storage; the board is lost on restart");
            builder.store(Arc::new(MemoryBoardStore::new()))
        }
        StorageBackend::Postgres => {
            let database = config.storage.database.as_ref().ok_or_else(|| {
                AppError::Config("DATABASE_URL is required for the postgres backend".to_string())
            })?;

            info!("Connecting to PostgreSQL...");
            let pool = create_pool(&PoolConfig::from(database))
                .await
                .map_err(|e| AppError::Storage(e.to_string()))?;
            let store = PgBoardStore::new(pool);
            store.ensure_schema().await?;
            info!("PostgreSQL connection established");

            builder.store(Arc::new(store))
        }
    };

    let service_context = builder
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    Ok(AppState::new(service_context, config))
}

/// Periodically delete ledger history outside the retention window
///
/// Returns `None` when retention is unlimited or the interval is zero.
pub fn spawn_history_pruner(ctx: ServiceContext, every: Duration) -> Option<JoinHandle<()>> {
    if every.is_zero() || ctx.policy().history_retention_days == 0 {
        info!("History pruning disabled");
        return None;
    }

    Some(tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            if let Err(e) = QuotaService::new(&ctx).prune_history().await {
                warn!(error = %e, "History pruning failed; retrying next interval");
            }
        }
    }))
}

/// Run the HTTP server until Ctrl+C
pub async fn run_server(app: Router, addr: &str) -> Result<(), AppError> {
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(anyhow::anyhow!("Server error: {e}")))?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr = config.api.address();
    let prune_interval = config.board.prune_interval;

    let state = create_app_state(config).await?;
    let pruner = spawn_history_pruner(state.service_context().clone(), prune_interval);

    let app = create_app(state)?;
    let result = run_server(app, &addr).await;

    if let Some(handle) = pruner {
        handle.abort();
    }
    result
}
