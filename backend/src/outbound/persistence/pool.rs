//! Async connection pool for the landlord database.
//!
//! Wraps `diesel-async`'s bb8 integration. Checkout never blocks the runtime
//! and fails after the configured timeout instead of queueing forever.

use std::time::Duration;

use diesel_async::AsyncPgConnection;
use mockable::Env;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};

/// Errors that can occur during pool operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    /// No connection became available in time.
    #[error("failed to get connection from pool: {message}")]
    Checkout { message: String },

    /// The pool could not be created.
    #[error("failed to build connection pool: {message}")]
    Build { message: String },

    /// `DATABASE_URL` is unset or blank.
    #[error("missing required environment variable: DATABASE_URL")]
    MissingDatabaseUrl,
}

impl PoolError {
    pub fn checkout(message: impl Into<String>) -> Self {
        Self::Checkout {
            message: message.into(),
        }
    }

    pub fn build(message: impl Into<String>) -> Self {
        Self::Build {
            message: message.into(),
        }
    }
}

const DATABASE_URL_ENV: &str = "DATABASE_URL";

/// Sizing and timeout settings for [`DbPool`].
///
/// Defaults: 10 connections, 1 kept idle, 10 second checkout timeout.
#[derive(Clone)]
pub struct PoolConfig {
    database_url: String,
    max_size: u32,
    min_idle: Option<u32>,
    connection_timeout: Duration,
}

impl PoolConfig {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_size: 10,
            min_idle: Some(1),
            connection_timeout: Duration::from_secs(10),
        }
    }

    #[must_use]
    pub fn with_max_size(mut self, max_size: u32) -> Self {
        self.max_size = max_size;
        self
    }

    #[must_use]
    pub fn with_min_idle(mut self, min_idle: Option<u32>) -> Self {
        self.min_idle = min_idle;
        self
    }

    #[must_use]
    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    /// Read the connection string from `DATABASE_URL`.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::MissingDatabaseUrl`] when the variable is unset or
    /// blank.
    pub fn from_env<E: Env>(env: &E) -> Result<Self, PoolError> {
        env.string(DATABASE_URL_ENV)
            .filter(|url| !url.trim().is_empty())
            .map(Self::new)
            .ok_or(PoolError::MissingDatabaseUrl)
    }

    /// Connection string, as supplied by `DATABASE_URL`.
    pub fn database_url(&self) -> &str {
        &self.database_url
    }
}

impl std::fmt::Debug for PoolConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The URL usually embeds credentials.
        f.debug_struct("PoolConfig")
            .field("database_url", &"<redacted>")
            .field("max_size", &self.max_size)
            .field("min_idle", &self.min_idle)
            .field("connection_timeout", &self.connection_timeout)
            .finish()
    }
}

/// Shared PostgreSQL connection pool handed to every repository.
#[derive(Clone)]
pub struct DbPool {
    inner: Pool<AsyncPgConnection>,
}

impl DbPool {
    /// Build the pool and open its idle connections.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Build`] when the URL is invalid or the initial
    /// connections cannot be established.
    pub async fn new(config: PoolConfig) -> Result<Self, PoolError> {
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(config.database_url);
        let inner = Pool::builder()
            .max_size(config.max_size)
            .min_idle(config.min_idle)
            .connection_timeout(config.connection_timeout)
            .build(manager)
            .await
            .map_err(|err| PoolError::build(err.to_string()))?;
        Ok(Self { inner })
    }

    /// Check out a connection.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Checkout`] when no connection is available within
    /// the configured timeout.
    pub async fn get(&self) -> Result<PooledConnection<'_, AsyncPgConnection>, PoolError> {
        self.inner
            .get()
            .await
            .map_err(|err| PoolError::checkout(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn defaults_favour_a_small_deployment() {
        let config = PoolConfig::new("postgres://localhost/landlords");

        assert_eq!(config.database_url(), "postgres://localhost/landlords");
        assert_eq!(config.max_size, 10);
        assert_eq!(config.min_idle, Some(1));
        assert_eq!(config.connection_timeout, Duration::from_secs(10));
    }

    #[rstest]
    fn builder_overrides_defaults() {
        let config = PoolConfig::new("postgres://localhost/landlords")
            .with_max_size(4)
            .with_min_idle(None)
            .with_connection_timeout(Duration::from_secs(2));

        assert_eq!(config.max_size, 4);
        assert_eq!(config.min_idle, None);
        assert_eq!(config.connection_timeout, Duration::from_secs(2));
    }

    fn env_with(url: Option<&'static str>) -> mockable::MockEnv {
        let mut env = mockable::MockEnv::new();
        env.expect_string()
            .returning(move |name| (name == DATABASE_URL_ENV).then(|| url.map(str::to_owned)).flatten());
        env
    }

    #[rstest]
    fn from_env_reads_database_url() {
        let config = PoolConfig::from_env(&env_with(Some("postgres://db/landlords")))
            .expect("url present");
        assert_eq!(config.database_url(), "postgres://db/landlords");
    }

    #[rstest]
    #[case(None)]
    #[case(Some("   "))]
    fn from_env_requires_database_url(#[case] url: Option<&'static str>) {
        let err = PoolConfig::from_env(&env_with(url)).expect_err("url missing");
        assert_eq!(err, PoolError::MissingDatabaseUrl);
    }

    #[rstest]
    fn debug_output_hides_credentials() {
        let config = PoolConfig::new("postgres://admin:hunter2@db/landlords");
        assert!(!format!("{config:?}").contains("hunter2"));
    }
}
