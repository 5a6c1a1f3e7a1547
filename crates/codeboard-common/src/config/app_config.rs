//! Application configuration structs
//!
//! Loads configuration from environment variables (and `.env` if present).

use std::env;
use std::str::FromStr;
use std::time::Duration;

use codeboard_core::{BoardPolicy, ContentRules, DayBoundary, MatchMode, QuotaLimits};

/// Main application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ServerConfig,
    pub storage: StorageConfig,
    pub board: BoardConfig,
    pub rate_limit: RateLimitConfig,
    pub cors: CorsConfig,
}

/// General application settings
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub name: String,
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "production" => Ok(Self::Production),
            "staging" => Ok(Self::Staging),
            "development" => Ok(Self::Development),
            other => Err(format!("unknown environment '{other}'")),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Where codes and quotas are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackend {
    /// Process memory; lost on restart
    #[default]
    Memory,
    /// PostgreSQL via `DATABASE_URL`
    Postgres,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "memory" | "mem" => Ok(Self::Memory),
            "postgres" | "postgresql" | "pg" => Ok(Self::Postgres),
            other => Err(format!("unknown storage backend '{other}'")),
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Present when `backend` is `Postgres`
    pub database: Option<DatabaseConfig>,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Board rules plus the knobs around them
#[derive(Debug, Clone)]
pub struct BoardConfig {
    pub policy: BoardPolicy,
    /// How long the shared listing is served from memory; zero disables
    pub list_cache_ttl: Duration,
    /// How often old ledger history is pruned; zero disables the pruner
    pub prune_interval: Duration,
}

/// Rate limiting configuration
///
/// One bucket shared by every caller. Size it for the whole client
/// population: N clients polling every T seconds need N/T requests per second.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub requests_per_second: u32,
    pub burst: u32,
}

/// CORS configuration
#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

// Default value functions
fn default_app_name() -> String {
    "codeboard".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

fn default_list_cache_ttl_ms() -> u64 {
    3000
}

fn default_prune_interval_secs() -> u64 {
    3600
}

fn default_requests_per_second() -> u32 {
    10
}

fn default_burst() -> u32 {
    50
}

/// Reads one variable through `lookup` and parses it, `None` if unset
fn parse_var<T, F>(lookup: &F, name: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::InvalidValue(name, e.to_string())),
        _ => Ok(None),
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required variables are missing or malformed
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend: StorageBackend = parse_var(&lookup, "STORAGE_BACKEND")?.unwrap_or_default();
        let database = match backend {
            StorageBackend::Memory => None,
            StorageBackend::Postgres => Some(DatabaseConfig {
                url: lookup("DATABASE_URL").ok_or(ConfigError::MissingVar("DATABASE_URL"))?,
                max_connections: parse_var(&lookup, "DATABASE_MAX_CONNECTIONS")?
                    .unwrap_or_else(default_max_connections),
                min_connections: parse_var(&lookup, "DATABASE_MIN_CONNECTIONS")?
                    .unwrap_or_else(default_min_connections),
            }),
        };

        let defaults = BoardPolicy::default();
        let policy = BoardPolicy {
            limits: QuotaLimits {
                post_daily_limit: parse_var(&lookup, "POST_DAILY_LIMIT")?
                    .unwrap_or(defaults.limits.post_daily_limit),
                claim_daily_limit: parse_var(&lookup, "CLAIM_DAILY_LIMIT")?
                    .unwrap_or(defaults.limits.claim_daily_limit),
            },
            initial_uses: parse_var(&lookup, "INITIAL_USES")?.unwrap_or(defaults.initial_uses),
            content: ContentRules {
                max_chars: parse_var(&lookup, "MAX_CONTENT_CHARS")?
                    .unwrap_or(defaults.content.max_chars),
                mode: parse_var::<MatchMode, _>(&lookup, "CODE_MATCH_MODE")?
                    .unwrap_or(defaults.content.mode),
            },
            day_boundary: parse_var::<DayBoundary, _>(&lookup, "DAY_BOUNDARY")?
                .unwrap_or(defaults.day_boundary),
            max_list_limit: parse_var(&lookup, "MAX_LIST_LIMIT")?
                .unwrap_or(defaults.max_list_limit),
            history_retention_days: parse_var(&lookup, "HISTORY_RETENTION_DAYS")?
                .unwrap_or(defaults.history_retention_days),
        };

        if policy.initial_uses == 0 {
            return Err(ConfigError::InvalidValue(
                "INITIAL_USES",
                "must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            app: AppSettings {
                name: lookup("APP_NAME").unwrap_or_else(default_app_name),
                env: parse_var(&lookup, "APP_ENV")?.unwrap_or_default(),
            },
            api: ServerConfig {
                host: lookup("API_HOST").unwrap_or_else(default_host),
                port: parse_var(&lookup, "API_PORT")?.ok_or(ConfigError::MissingVar("API_PORT"))?,
            },
            storage: StorageConfig { backend, database },
            board: BoardConfig {
                policy,
                list_cache_ttl: Duration::from_millis(
                    parse_var(&lookup, "LIST_CACHE_TTL_MS")?
                        .unwrap_or_else(default_list_cache_ttl_ms),
                ),
                prune_interval: Duration::from_secs(
                    parse_var(&lookup, "HISTORY_PRUNE_INTERVAL_SECS")?
                        .unwrap_or_else(default_prune_interval_secs),
                ),
            },
            rate_limit: RateLimitConfig {
                requests_per_second: parse_var(&lookup, "RATE_LIMIT_REQUESTS_PER_SECOND")?
                    .unwrap_or_else(default_requests_per_second),
                burst: parse_var(&lookup, "RATE_LIMIT_BURST")?.unwrap_or_else(default_burst),
            },
            cors: CorsConfig {
                allowed_origins: lookup("CORS_ALLOWED_ORIGINS")
                    .map(|s| {
                        s.split(',')
                            .map(str::trim)
                            .filter(|s| !s.is_empty())
                            .map(String::from)
                            .collect()
                    })
                    .unwrap_or_default(),
            },
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        AppConfig::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn test_environment_is_production() {
        assert!(!Environment::Development.is_production());
        assert!(!Environment::Staging.is_production());
        assert!(Environment::Production.is_production());
    }

    #[test]
    fn test_server_address() {
        let config = ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 8080,
        };
        assert_eq!(config.address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = load(&[("API_PORT", "8000")]).unwrap();

        assert_eq!(config.app.name, "codeboard");
        assert_eq!(config.app.env, Environment::Development);
        assert_eq!(config.api.address(), "127.0.0.1:8000");
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert!(config.storage.database.is_none());
        assert_eq!(config.board.policy, BoardPolicy::default());
        assert_eq!(config.board.list_cache_ttl, Duration::from_millis(3000));
        assert_eq!(config.board.prune_interval, Duration::from_secs(3600));
        assert_eq!(config.rate_limit.burst, 50);
        assert!(config.cors.allowed_origins.is_empty());
    }

    #[test]
    fn test_missing_port() {
        let err = load(&[]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar("API_PORT")));
    }

    #[test]
    fn test_postgres_requires_url() {
        let err = load(&[("API_PORT", "8000"), ("STORAGE_BACKEND", "postgres")]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar("DATABASE_URL")));

        let config = load(&[
            ("API_PORT", "8000"),
            ("STORAGE_BACKEND", "postgres"),
            ("DATABASE_URL", "postgres://localhost/codeboard"),
        ])
        .unwrap();
        let database = config.storage.database.unwrap();
        assert_eq!(database.url, "postgres://localhost/codeboard");
        assert_eq!(database.max_connections, 20);
    }

    #[test]
    fn test_board_overrides() {
        let config = load(&[
            ("API_PORT", "8000"),
            ("POST_DAILY_LIMIT", "2"),
            ("CLAIM_DAILY_LIMIT", "7"),
            ("INITIAL_USES", "3"),
            ("CODE_MATCH_MODE", "full"),
            ("DAY_BOUNDARY", "local"),
            ("LIST_CACHE_TTL_MS", "0"),
            ("HISTORY_PRUNE_INTERVAL_SECS", "0"),
            ("MAX_LIST_LIMIT", "200"),
            ("CORS_ALLOWED_ORIGINS", "https://a.example, https://b.example,"),
        ])
        .unwrap();

        let policy = config.board.policy;
        assert_eq!(policy.limits.post_daily_limit, 2);
        assert_eq!(policy.limits.claim_daily_limit, 7);
        assert_eq!(policy.initial_uses, 3);
        assert_eq!(policy.content.mode, MatchMode::Full);
        assert_eq!(policy.day_boundary, DayBoundary::Local);
        assert_eq!(config.board.list_cache_ttl, Duration::ZERO);
        assert_eq!(config.board.prune_interval, Duration::ZERO);
        assert_eq!(policy.max_list_limit, 200);
        assert_eq!(
            config.cors.allowed_origins,
            vec!["https://a.example", "https://b.example"]
        );
    }

    #[test]
    fn test_invalid_values() {
        let err = load(&[("API_PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue("API_PORT", _)));

        let err = load(&[("API_PORT", "8000"), ("DAY_BOUNDARY", "noon")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue("DAY_BOUNDARY", _)));

        let err = load(&[("API_PORT", "8000"), ("INITIAL_USES", "0")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue("INITIAL_USES", _)));
    }
}
