// Shared Kernel - Domain Driven Design
// Following Clean Architecture + Hexagonal Architecture patterns

pub mod application;      // Shared application layer patterns
pub mod config;           // Environment-driven configuration
pub mod domain;           // Shared domain concepts (value object contract)
pub mod errors;           // Shared error types
pub mod infrastructure;   // Shared infrastructure (database pool)
pub mod utils;            // Logging and validation helpers

// Re-exports for convenience
pub use config::{AppConfig, DatabaseConfig, StorageBackend};
pub use errors::{AppError, AppResult};
pub use infrastructure::database::Database;
