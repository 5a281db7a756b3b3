//! Embedded schema migrations.

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Failure while applying migrations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to run database migrations: {message}")]
pub struct MigrationError {
    message: String,
}

impl MigrationError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Apply every pending migration.
///
/// Diesel's migration harness needs a synchronous connection, so the work
/// runs on the blocking thread pool.
pub async fn run_pending_migrations(database_url: &str) -> Result<(), MigrationError> {
    let url = database_url.to_owned();
    tokio::task::spawn_blocking(move || -> Result<(), MigrationError> {
        let mut conn =
            PgConnection::establish(&url).map_err(|err| MigrationError::new(err.to_string()))?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|err| MigrationError::new(err.to_string()))?;
        info!(count = applied.len(), "database migrations applied");
        Ok(())
    })
    .await
    .map_err(|err| MigrationError::new(err.to_string()))?
}
