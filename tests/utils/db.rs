/// Database test utilities
///
/// PostgreSQL tests are opt-in: they run only when TEST_DATABASE_URL is set
/// (directly or through `.env`) and are marked `#[ignore]`.
use diesel::connection::SimpleConnection;
use herbarium_lib::shared::{Database, DatabaseConfig};
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

const UP_SQL: &str = include_str!("../../migrations/2025-01-15-000000_create_terms/up.sql");
const DOWN_SQL: &str = include_str!("../../migrations/2025-01-15-000000_create_terms/down.sql");

/// Global test mutex for serialization
static TEST_LOCK: Mutex<()> = Mutex::const_new(());

/// Acquire test lock so schema resets never interleave
pub async fn acquire_test_lock() -> MutexGuard<'static, ()> {
    TEST_LOCK.lock().await
}

pub fn test_database_url() -> Option<String> {
    dotenvy::dotenv().ok();
    std::env::var("TEST_DATABASE_URL").ok()
}

/// Drop and recreate the dictionary schema, then hand back a pool over it
pub fn fresh_database(url: &str) -> Arc<Database> {
    let mut config = DatabaseConfig::new(url);
    config.max_pool_size = Some(4);

    let db = Database::new(&config).expect("Failed to create test database pool");
    let mut conn = db.get_connection().expect("Failed to get DB connection");

    conn.batch_execute(DOWN_SQL)
        .expect("Failed to drop dictionary schema");
    conn.batch_execute(UP_SQL)
        .expect("Failed to create dictionary schema");

    Arc::new(db)
}
