//! Runtime configuration loaded from the environment (and `.env`)

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::shared::errors::{AppError, AppResult};

const DEFAULT_CONNECTION_TIMEOUT_SECS: u64 = 10;

/// Which `TermRepository` adapter backs the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackend {
    #[default]
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(StorageBackend::Postgres),
            "memory" | "in-memory" | "inmemory" => Ok(StorageBackend::Memory),
            other => Err(AppError::ConfigurationError(format!(
                "Unknown storage backend '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    /// Falls back to a size derived from the CPU count
    pub max_pool_size: Option<u32>,
    pub connection_timeout: Duration,
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_pool_size: None,
            connection_timeout: Duration::from_secs(DEFAULT_CONNECTION_TIMEOUT_SECS),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub storage: StorageBackend,
    /// Required only for the Postgres backend
    pub database: Option<DatabaseConfig>,
}

impl AppConfig {
    /// Load configuration from process environment, reading `.env` first if present
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let storage = match lookup("HERBARIUM_STORAGE") {
            Some(value) => value.parse()?,
            None => StorageBackend::default(),
        };

        let database = match lookup("DATABASE_URL") {
            Some(url) => {
                let mut config = DatabaseConfig::new(url);
                if let Some(size) = lookup("DATABASE_MAX_POOL_SIZE") {
                    config.max_pool_size = Some(parse_number("DATABASE_MAX_POOL_SIZE", &size)?);
                }
                if let Some(secs) = lookup("DATABASE_CONNECTION_TIMEOUT_SECS") {
                    config.connection_timeout = Duration::from_secs(parse_number(
                        "DATABASE_CONNECTION_TIMEOUT_SECS",
                        &secs,
                    )?);
                }
                Some(config)
            }
            None => None,
        };

        if storage == StorageBackend::Postgres && database.is_none() {
            return Err(AppError::ConfigurationError(
                "DATABASE_URL environment variable not found".to_string(),
            ));
        }

        Ok(Self { storage, database })
    }

    pub fn in_memory() -> Self {
        Self {
            storage: StorageBackend::Memory,
            database: None,
        }
    }
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> AppResult<T> {
    value.trim().parse().map_err(|_| {
        AppError::ConfigurationError(format!("{} must be a positive number, got '{}'", key, value))
    })
}
