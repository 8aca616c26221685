//! Application configuration management
//!
//! This module handles loading and validating configuration from environment variables.
//! All configuration is loaded at startup and validated before the application runs.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::constants::{
    DEFAULT_DATABASE_MAX_CONNECTIONS, DEFAULT_EXPIRY_SWEEP_INTERVAL_SECONDS,
    DEFAULT_REQUEST_TIMEOUT_SECONDS, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT,
    DEFAULT_UPSERT_MAX_ATTEMPTS,
};

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub scheduler: SchedulerConfig,
    pub rating: RatingConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub rust_log: String,
    pub log_format: LogFormat,
    pub request_timeout_seconds: u64,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Only required when the postgres backend is selected
    pub url: Option<String>,
    pub max_connections: u32,
}

/// Which storage collaborator backs the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

/// Storage configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Create the preset rubric at startup when it does not exist
    pub seed_preset_rubric: bool,
}

/// Expiry sweep configuration
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub expiry_sweep_enabled: bool,
    pub expiry_sweep_interval_seconds: u64,
}

/// Rating engine configuration
#[derive(Debug, Clone)]
pub struct RatingConfig {
    /// Only APPROVED entries accept ratings
    pub require_approved_entries: bool,
    /// Bound on fetch/insert/update attempts before a lost race surfaces as a conflict
    pub upsert_max_attempts: u32,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = Self {
            server: ServerConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            storage: StorageConfig::from_env()?,
            scheduler: SchedulerConfig::from_env()?,
            rating: RatingConfig::from_env()?,
        };
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.backend == StorageBackend::Postgres && self.database.url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL".to_string()));
        }
        if self.scheduler.expiry_sweep_interval_seconds == 0 {
            return Err(ConfigError::InvalidValue(
                "EXPIRY_SWEEP_INTERVAL_SECS".to_string(),
            ));
        }
        if self.rating.upsert_max_attempts == 0 {
            return Err(ConfigError::InvalidValue(
                "RATING_UPSERT_MAX_ATTEMPTS".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for Config {
    /// In-memory configuration with every default applied
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: DEFAULT_SERVER_HOST.to_string(),
                port: DEFAULT_SERVER_PORT,
                rust_log: "info".to_string(),
                log_format: LogFormat::Pretty,
                request_timeout_seconds: DEFAULT_REQUEST_TIMEOUT_SECONDS,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: DEFAULT_DATABASE_MAX_CONNECTIONS,
            },
            storage: StorageConfig {
                backend: StorageBackend::Memory,
                seed_preset_rubric: false,
            },
            scheduler: SchedulerConfig {
                expiry_sweep_enabled: true,
                expiry_sweep_interval_seconds: DEFAULT_EXPIRY_SWEEP_INTERVAL_SECONDS,
            },
            rating: RatingConfig {
                require_approved_entries: false,
                upsert_max_attempts: DEFAULT_UPSERT_MAX_ATTEMPTS,
            },
        }
    }
}

impl ServerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env::var("SERVER_HOST").unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            port: parse_var("SERVER_PORT", DEFAULT_SERVER_PORT)?,
            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            log_format: match env::var("LOG_FORMAT").as_deref() {
                Ok("json") => LogFormat::Json,
                Ok("pretty") | Err(_) => LogFormat::Pretty,
                Ok(_) => return Err(ConfigError::InvalidValue("LOG_FORMAT".to_string())),
            },
            request_timeout_seconds: parse_var(
                "REQUEST_TIMEOUT_SECS",
                DEFAULT_REQUEST_TIMEOUT_SECONDS,
            )?,
        })
    }

    /// Per-request timeout applied by the HTTP layer
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

impl DatabaseConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            url: env::var("DATABASE_URL").ok(),
            max_connections: parse_var(
                "DATABASE_MAX_CONNECTIONS",
                DEFAULT_DATABASE_MAX_CONNECTIONS,
            )?,
        })
    }
}

impl StorageConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            backend: match env::var("STORAGE_BACKEND").as_deref() {
                Ok("postgres") | Err(_) => StorageBackend::Postgres,
                Ok("memory") => StorageBackend::Memory,
                Ok(_) => return Err(ConfigError::InvalidValue("STORAGE_BACKEND".to_string())),
            },
            seed_preset_rubric: parse_var("SEED_PRESET_RUBRIC", false)?,
        })
    }
}

impl SchedulerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            expiry_sweep_enabled: parse_var("EXPIRY_SWEEP_ENABLED", true)?,
            expiry_sweep_interval_seconds: parse_var(
                "EXPIRY_SWEEP_INTERVAL_SECS",
                DEFAULT_EXPIRY_SWEEP_INTERVAL_SECONDS,
            )?,
        })
    }

    /// Interval between two expiry sweeps
    pub fn expiry_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.expiry_sweep_interval_seconds)
    }
}

impl RatingConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            require_approved_entries: parse_var("RATING_REQUIRE_APPROVED_ENTRIES", false)?,
            upsert_max_attempts: parse_var(
                "RATING_UPSERT_MAX_ATTEMPTS",
                DEFAULT_UPSERT_MAX_ATTEMPTS,
            )?,
        })
    }
}

/// Read an optional variable, falling back to `default` when unset
fn parse_var<T: FromStr>(key: &str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        Err(_) => Ok(default),
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(String),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}
