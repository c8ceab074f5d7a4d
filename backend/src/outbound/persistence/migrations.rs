//! Embedded schema migrations.
//!
//! `diesel_migrations` drives a synchronous connection, so the harness runs
//! on a blocking thread through diesel-async's connection wrapper.

use diesel::Connection;
use diesel_async::AsyncPgConnection;
use diesel_async::async_connection_wrapper::AsyncConnectionWrapper;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

/// Migrations from `backend/migrations`, compiled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Errors raised while applying migrations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MigrationError {
    #[error("failed to connect for migrations: {message}")]
    Connection { message: String },
    #[error("failed to apply migrations: {message}")]
    Apply { message: String },
}

/// Apply every pending migration to the database at `database_url`.
///
/// # Errors
///
/// Returns [`MigrationError::Connection`] when the database cannot be reached
/// and [`MigrationError::Apply`] when a migration fails.
pub async fn run_pending_migrations(database_url: &str) -> Result<(), MigrationError> {
    let url = database_url.to_owned();
    let applied = tokio::task::spawn_blocking(move || {
        let mut conn = AsyncConnectionWrapper::<AsyncPgConnection>::establish(&url).map_err(
            |err| MigrationError::Connection {
                message: err.to_string(),
            },
        )?;
        conn.run_pending_migrations(MIGRATIONS)
            .map(|versions| versions.len())
            .map_err(|err| MigrationError::Apply {
                message: err.to_string(),
            })
    })
    .await
    .map_err(|err| MigrationError::Apply {
        message: format!("migration task failed: {err}"),
    })??;

    info!(applied, "database migrations applied");
    Ok(())
}
