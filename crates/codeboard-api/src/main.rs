//! Codeboard API Server entry point
//!
//! Run with:
//! ```bash
//! API_PORT=8080 cargo run -p codeboard-api
//! ```
//!
//! Configuration is loaded from environment variables (and `.env`).

use codeboard_common::{try_init_tracing_with_config, AppConfig, Environment, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Logging is configured before the full config so config errors are visible
    let env = std::env::var("APP_ENV")
        .ok()
        .and_then(|value| value.parse::<Environment>().ok())
        .unwrap_or_default();
    let log_format = std::env::var("LOG_FORMAT").ok();
    let tracing_config = TracingConfig::for_environment(env, log_format.as_deref());
    if let Err(e) = try_init_tracing_with_config(tracing_config) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    if let Err(e) = run().await {
        error!(error = %e, "Server failed to start");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting Codeboard API Server...");

    let config = AppConfig::from_env().map_err(|e| {
        error!(error = %e, "Failed to load configuration");
        e
    })?;

    info!(
        env = ?config.app.env,
        port = config.api.port,
        backend = ?config.storage.backend,
        "Configuration loaded"
    );

    codeboard_api::run(config).await?;

    Ok(())
}
