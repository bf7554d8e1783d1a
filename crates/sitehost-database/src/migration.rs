//! Database migration runner.

use sqlx::SqlitePool;
use tracing::info;

use sitehost_core::error::{AppError, ErrorKind};
use sitehost_core::result::AppResult;

/// Run all pending database migrations.
pub async fn run_migrations(pool: &SqlitePool) -> AppResult<()> {
    info!("Running database migrations...");

    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to run migrations: {e}"),
                e,
            )
        })?;

    info!("Database migrations completed successfully");
    Ok(())
}
