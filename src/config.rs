//! Configuration module
//!
//! Loads configuration from environment variables.

use std::env;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Database connection URL
    pub database_url: String,

    /// Maximum database connections in pool
    pub database_max_connections: u32,

    /// Connections kept open even when idle
    pub database_min_connections: u32,

    /// Environment (development, test, production)
    pub environment: String,

    /// Upper bound for one transfer unit of work, lock waits included
    pub transfer_timeout: Duration,

    /// How long a locked read may wait for a row lock. `None` waits indefinitely.
    pub lock_timeout: Option<Duration>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url =
            lookup("DATABASE_URL").ok_or(ConfigError::MissingEnv("DATABASE_URL"))?;

        let database_max_connections = parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 10)?;
        let database_min_connections = parse_or(&lookup, "DATABASE_MIN_CONNECTIONS", 0)?;

        if database_max_connections == 0 || database_min_connections > database_max_connections {
            return Err(ConfigError::InvalidValue("DATABASE_MAX_CONNECTIONS"));
        }

        let environment = lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string());

        let transfer_timeout_ms: u64 = parse_or(&lookup, "TRANSFER_TIMEOUT_MS", 5000)?;
        if transfer_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue("TRANSFER_TIMEOUT_MS"));
        }

        // 0 disables the lock-wait bound
        let lock_timeout_ms: u64 = parse_or(&lookup, "LOCK_TIMEOUT_MS", 3000)?;
        let lock_timeout = (lock_timeout_ms > 0).then(|| Duration::from_millis(lock_timeout_ms));

        Ok(Self {
            database_url,
            database_max_connections,
            database_min_connections,
            environment,
            transfer_timeout: Duration::from_millis(transfer_timeout_ms),
            lock_timeout,
        })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue(key)),
        None => Ok(default),
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(&'static str),
}
