/// Schema setup for the PostgreSQL adapters
///
/// The schema lives in `taskmgr-shared/migrations/` and is embedded at
/// compile time. It is applied once at startup; there is no rollback
/// tooling.

use sqlx::postgres::PgPool;
use tracing::{info, warn};

/// Applies all pending migrations
///
/// # Errors
///
/// Returns an error if a migration fails to execute or the recorded history
/// disagrees with the embedded files.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Starting database migrations");

    match sqlx::migrate!("./migrations").run(pool).await {
        Ok(()) => {
            info!("All database migrations completed successfully");
            Ok(())
        }
        Err(e) => {
            warn!("Migration failed: {}", e);
            Err(e)
        }
    }
}
