//! Embedded schema migrations
//!
//! Migration files live in the workspace `migrations/` directory and are
//! compiled into the binary, so a deployed binary never depends on the
//! source tree being present.

use sqlx::migrate::{MigrateError, Migrator};
use sqlx::PgPool;
use tracing::info;

/// All migrations, embedded at compile time
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Apply any pending migrations.
///
/// Both binaries run this at startup before serving anything; the migrator
/// takes an advisory lock, so concurrent starts are safe. Failures here are
/// fatal: a half-migrated schema must never take traffic.
pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await?;
    info!("database migrations applied");
    Ok(())
}
