//! Async connection pool for Diesel PostgreSQL connections.
//!
//! Wraps `diesel-async` and `bb8` so the repository adapters check out
//! native-async connections instead of blocking worker threads. Pool
//! failures map to [`PoolError`] variants that the adapters fold into
//! their port errors.

use std::time::Duration;

use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};

/// Errors raised by pool construction and checkout.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    /// The pool could not be built.
    #[error("database pool could not be built: {message}")]
    Build {
        /// Underlying error text.
        message: String,
    },
    /// A connection could not be checked out in time.
    #[error("database connection checkout failed: {message}")]
    Checkout {
        /// Underlying error text.
        message: String,
    },
}

/// Builder-style configuration for [`DbPool`].
///
/// Defaults suit a small install: five connections with a thirty-second
/// checkout timeout.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    database_url: String,
    max_size: u32,
    connection_timeout: Duration,
}

impl PoolConfig {
    /// Create a configuration for the given database URL.
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_size: 5,
            connection_timeout: Duration::from_secs(30),
        }
    }

    /// Override the maximum number of pooled connections.
    #[must_use]
    pub fn with_max_size(mut self, max_size: u32) -> Self {
        self.max_size = max_size;
        self
    }

    /// Override the connection checkout timeout.
    #[must_use]
    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    /// The configured database URL.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database_url
    }
}

/// Async PostgreSQL pool shared by the Diesel repositories.
#[derive(Clone)]
pub struct DbPool {
    pool: Pool<AsyncPgConnection>,
}

impl DbPool {
    /// Build the pool.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Build`] when the pool cannot be constructed,
    /// for instance on an invalid URL or an unreachable server.
    pub async fn new(config: PoolConfig) -> Result<Self, PoolError> {
        let pool = Pool::builder()
            .max_size(config.max_size)
            .connection_timeout(config.connection_timeout)
            .build(AsyncDieselConnectionManager::<AsyncPgConnection>::new(
                &config.database_url,
            ))
            .await
            .map_err(|err| PoolError::Build {
                message: err.to_string(),
            })?;
        Ok(Self { pool })
    }

    /// Check out a connection.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Checkout`] when no connection becomes available
    /// within the configured timeout.
    pub async fn get(&self) -> Result<PooledConnection<'_, AsyncPgConnection>, PoolError> {
        self.pool.get().await.map_err(|err| PoolError::Checkout {
            message: err.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for pool configuration.

    use super::*;

    #[test]
    fn config_defaults_suit_a_small_install() {
        let config = PoolConfig::new("postgres://localhost/charity");
        assert_eq!(config.database_url(), "postgres://localhost/charity");
        assert_eq!(config.max_size, 5);
        assert_eq!(config.connection_timeout, Duration::from_secs(30));
    }

    #[test]
    fn config_builder_overrides_apply() {
        let config = PoolConfig::new("postgres://localhost/charity")
            .with_max_size(12)
            .with_connection_timeout(Duration::from_secs(5));
        assert_eq!(config.max_size, 12);
        assert_eq!(config.connection_timeout, Duration::from_secs(5));
    }

    #[test]
    fn pool_errors_render_their_message() {
        let err = PoolError::Checkout {
            message: "timed out".to_owned(),
        };
        assert!(err.to_string().contains("timed out"));
    }
}
