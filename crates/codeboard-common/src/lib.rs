//! # codeboard-common
//!
//! Shared utilities including configuration, error handling, and telemetry.

pub mod config;
pub mod error;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use config::{
    AppConfig, AppSettings, BoardConfig, ConfigError, CorsConfig, DatabaseConfig, Environment,
    RateLimitConfig, ServerConfig, StorageBackend, StorageConfig,
};
pub use error::{AppError, ErrorResponse, SERVER_ERROR_MESSAGE};
pub use telemetry::{try_init_tracing, try_init_tracing_with_config, TracingConfig, TracingError};
