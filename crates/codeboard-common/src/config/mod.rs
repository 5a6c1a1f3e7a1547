//! Configuration structs

mod app_config;

pub use app_config::{
    AppConfig, AppSettings, BoardConfig, ConfigError, CorsConfig, DatabaseConfig, Environment,
    RateLimitConfig, ServerConfig, StorageBackend, StorageConfig,
};
