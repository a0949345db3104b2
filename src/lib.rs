pub mod modules;
mod schema;
pub mod shared;

use std::sync::Arc;

use modules::dictionary::{
    InMemoryTermRepository, TermRepository, TermRepositoryImpl, TermService,
};
use shared::{AppConfig, AppError, AppResult, Database, StorageBackend};

/// Wired-up services handed to the presentation layer
#[derive(Clone)]
pub struct AppServices {
    pub term_repository: Arc<dyn TermRepository>,
    pub term_service: Arc<TermService>,
}

impl AppServices {
    /// Build services for the configured storage backend
    pub fn initialize(config: &AppConfig) -> AppResult<Self> {
        let term_repository: Arc<dyn TermRepository> = match config.storage {
            StorageBackend::Postgres => {
                let database_config = config.database.as_ref().ok_or_else(|| {
                    AppError::ConfigurationError(
                        "Postgres storage selected but no database configured".to_string(),
                    )
                })?;
                let db = Arc::new(Database::new(database_config)?);
                Arc::new(TermRepositoryImpl::new(db))
            }
            StorageBackend::Memory => {
                crate::log_warn!("Using in-memory term storage; data is lost on shutdown");
                Arc::new(InMemoryTermRepository::new())
            }
        };

        Ok(Self::with_repository(term_repository))
    }

    pub fn in_memory() -> Self {
        Self::with_repository(Arc::new(InMemoryTermRepository::new()))
    }

    pub fn with_repository(term_repository: Arc<dyn TermRepository>) -> Self {
        let term_service = Arc::new(TermService::new(Arc::clone(&term_repository)));
        Self {
            term_repository,
            term_service,
        }
    }
}

/// Load `.env`, start logging and wire services from the environment
pub fn init() -> AppResult<AppServices> {
    shared::utils::init_logger();

    let config = AppConfig::from_env()?;
    crate::log_info!("Starting herbarium dictionary with {:?} storage", config.storage);

    AppServices::initialize(&config)
}
