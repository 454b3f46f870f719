//! Database migration runner.

use tracing::info;

use metahub_core::error::{AppError, ErrorKind};
use metahub_core::result::AppResult;

use crate::connection::DatabasePool;

/// Run all pending catalog migrations.
pub async fn run_migrations(pool: &DatabasePool) -> AppResult<()> {
    let migrator = sqlx::migrate!("../../migrations");
    info!(
        available = migrator.iter().count(),
        "Running catalog migrations"
    );

    migrator.run(pool.pool()).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::Database,
            format!("Failed to run migrations: {e}"),
            e,
        )
    })?;

    info!("Catalog migrations completed");
    Ok(())
}
