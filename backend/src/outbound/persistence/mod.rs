//! PostgreSQL persistence adapters.

mod diesel_donation_repository;
mod models;
mod pool;
pub mod schema;

use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

pub use diesel_donation_repository::DieselDonationLedger;
pub use models::DonationRow;
pub use pool::{DbPool, PoolConfig, PoolError};

/// SQL migrations compiled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Failures raised while applying migrations at startup.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    /// The database connection could not be established.
    #[error("failed to connect for migrations: {message}")]
    Connect {
        /// Underlying error text.
        message: String,
    },
    /// A migration failed to apply.
    #[error("failed to apply migrations: {message}")]
    Apply {
        /// Underlying error text.
        message: String,
    },
}

/// Apply any pending migrations against `database_url`.
///
/// The migration harness is synchronous, so it runs on a blocking thread
/// over the async connection wrapper.
///
/// # Errors
///
/// Returns [`MigrationError`] when the connection or a migration fails.
pub async fn run_pending_migrations(database_url: &str) -> Result<(), MigrationError> {
    let url = database_url.to_owned();
    let outcome = tokio::task::spawn_blocking(move || {
        use diesel::Connection;
        use diesel_async::AsyncPgConnection;
        use diesel_async::async_connection_wrapper::AsyncConnectionWrapper;

        let mut conn: AsyncConnectionWrapper<AsyncPgConnection> =
            AsyncConnectionWrapper::establish(&url).map_err(|error| MigrationError::Connect {
                message: error.to_string(),
            })?;
        conn.run_pending_migrations(MIGRATIONS)
            .map(|_| ())
            .map_err(|error| MigrationError::Apply {
                message: error.to_string(),
            })
    })
    .await;

    match outcome {
        Ok(result) => result,
        Err(join_error) => Err(MigrationError::Apply {
            message: join_error.to_string(),
        }),
    }
}
