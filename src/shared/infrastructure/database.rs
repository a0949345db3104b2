use crate::log_info;
use crate::shared::config::DatabaseConfig;
use crate::shared::errors::AppError;
use crate::shared::utils::logger::LogContext;
use diesel::pg::PgConnection;
use diesel::r2d2::{self, ConnectionManager, Pool};
use std::time::{Duration, Instant};

const SLOW_CHECKOUT: Duration = Duration::from_millis(100);

pub type DbPool = Pool<ConnectionManager<PgConnection>>;
pub type DbConnection = r2d2::PooledConnection<ConnectionManager<PgConnection>>;

#[derive(Debug)]
pub struct Database {
    pool: DbPool,
}

impl Database {
    pub fn new(config: &DatabaseConfig) -> Result<Self, AppError> {
        let database_url = Self::validate_database_url(&config.url)?;

        let manager = ConnectionManager::<PgConnection>::new(database_url);

        let pool_config = Self::pool_config(config.max_pool_size);
        let pool = r2d2::Pool::builder()
            .max_size(pool_config.max_size)
            .min_idle(Some(pool_config.min_idle))
            .connection_timeout(config.connection_timeout)
            .idle_timeout(Some(Duration::from_secs(300)))
            .max_lifetime(Some(Duration::from_secs(1800)))
            .test_on_check_out(true)
            .build(manager)
            .map_err(|e| {
                AppError::DatabaseError(format!("Failed to create connection pool: {}", e))
            })?;

        log_info!(
            "Database connection pool initialized with max_size: {}, min_idle: {}",
            pool.max_size(),
            pool_config.min_idle
        );

        Ok(Self { pool })
    }

    fn validate_database_url(database_url: &str) -> Result<&str, AppError> {
        if !database_url.starts_with("postgres://") && !database_url.starts_with("postgresql://") {
            return Err(AppError::ConfigurationError(
                "Invalid database URL format. Must start with postgres:// or postgresql://"
                    .to_string(),
            ));
        }

        // Log connection attempt without exposing credentials
        log_info!(
            "Initializing database connection to: {}",
            database_url.rsplit('@').next().unwrap_or("unknown_host")
        );

        Ok(database_url)
    }

    /// Pool sizing: explicit size wins, otherwise derive from CPU count
    fn pool_config(max_pool_size: Option<u32>) -> PoolConfig {
        let max_size = match max_pool_size {
            Some(size) => size.max(1),
            None => {
                let cpu_count = std::thread::available_parallelism()
                    .map(|n| n.get())
                    .unwrap_or(4);
                std::cmp::min(cpu_count * 2, 20) as u32
            }
        };
        let min_idle = std::cmp::min(max_size, std::cmp::max(1, max_size / 4));

        PoolConfig { max_size, min_idle }
    }

    pub fn get_connection(&self) -> Result<DbConnection, AppError> {
        let start = Instant::now();

        match self.pool.get() {
            Ok(conn) => {
                let waited = start.elapsed();
                if waited > SLOW_CHECKOUT {
                    LogContext::slow_pool_checkout(waited);
                }
                Ok(conn)
            }
            Err(e) => {
                LogContext::storage_failure(&e, "Failed to acquire database connection from pool");
                Err(AppError::from(e))
            }
        }
    }
}

#[derive(Debug)]
struct PoolConfig {
    max_size: u32,
    min_idle: u32,
}
