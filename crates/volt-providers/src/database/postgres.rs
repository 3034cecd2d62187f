//! PostgreSQL driver backed by an r2d2 connection pool
//!
//! Pools are built unchecked: opening never touches the network, and the
//! first connection is made by [`PostgresPool::ping`]. Connections are
//! synchronous, so every checkout runs on the blocking thread pool.

use crate::constants::{DB_PING_QUERY, POSTGRES_DRIVER_NAME};
use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use r2d2::{HandleError, Pool, PooledConnection};
use r2d2_postgres::PostgresConnectionManager;
use r2d2_postgres::postgres::{Config as PgConfig, NoTls};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use volt_domain::error::{Error, Result};
use volt_domain::ports::{DatabaseDriver, DatabasePool, PoolStats, SharedDatabasePool};
use volt_domain::DatabaseConfig;

type Manager = PostgresConnectionManager<NoTls>;

/// Driver registered under the name `postgres`
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresDriver;

impl PostgresDriver {
    /// Create the driver
    pub fn new() -> Self {
        Self
    }

    /// Build a concrete pool from `config`
    pub fn open_pool(&self, config: &DatabaseConfig) -> Result<PostgresPool> {
        config.validate()?;

        let mut pg_config: PgConfig = config
            .dsn
            .parse()
            .map_err(|e| Error::database_with_source("Invalid PostgreSQL connection string", e))?;
        if !config.connect_timeout.is_zero() {
            pg_config.connect_timeout(config.connect_timeout);
        }

        let max_size = config.max_open_conns;
        let mut builder = Pool::builder()
            .max_size(max_size)
            .min_idle(Some(config.max_idle_conns.min(max_size)))
            .max_lifetime(non_zero(config.conn_max_lifetime))
            .idle_timeout(non_zero(config.conn_max_idle_time))
            .error_handler(Box::new(TracingErrorHandler));
        if !config.connect_timeout.is_zero() {
            builder = builder.connection_timeout(config.connect_timeout);
        }

        let pool = builder.build_unchecked(PostgresConnectionManager::new(pg_config, NoTls));
        debug!(max_size, "Opened PostgreSQL pool");

        Ok(PostgresPool {
            pool: ArcSwapOption::from_pointee(pool),
            max_size,
        })
    }
}

impl DatabaseDriver for PostgresDriver {
    fn name(&self) -> &str {
        POSTGRES_DRIVER_NAME
    }

    fn open(&self, config: &DatabaseConfig) -> Result<SharedDatabasePool> {
        Ok(Arc::new(self.open_pool(config)?))
    }
}

/// A PostgreSQL connection pool that can be closed exactly once
pub struct PostgresPool {
    pool: ArcSwapOption<Pool<Manager>>,
    max_size: u32,
}

impl PostgresPool {
    /// The underlying r2d2 pool, `None` once closed
    pub fn pool(&self) -> Option<Arc<Pool<Manager>>> {
        self.pool.load_full()
    }

    /// Check out a connection, waiting at most `timeout`
    ///
    /// Blocks the calling thread; use from `spawn_blocking` in async code.
    pub fn get_connection(&self, timeout: Duration) -> Result<PooledConnection<Manager>> {
        let pool = self.pool().ok_or_else(|| Error::database("database pool is closed"))?;
        pool.get_timeout(timeout)
            .map_err(|e| Error::database_with_source("Failed to get database connection", e))
    }
}

#[async_trait]
impl DatabasePool for PostgresPool {
    fn driver(&self) -> &str {
        POSTGRES_DRIVER_NAME
    }

    async fn ping(&self, timeout: Duration) -> Result<()> {
        let pool = self.pool().ok_or_else(|| Error::database("database pool is closed"))?;

        let check = tokio::task::spawn_blocking(move || -> Result<()> {
            let mut conn = pool
                .get_timeout(timeout)
                .map_err(|e| Error::database_with_source("Failed to connect", e))?;
            conn.execute(DB_PING_QUERY, &[])
                .map_err(|e| Error::database_with_source("Ping query failed", e))?;
            Ok(())
        });

        match tokio::time::timeout(timeout, check).await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => Err(Error::database_with_source("Ping task failed", e)),
            Err(_) => Err(Error::timeout("database ping")),
        }
    }

    fn stats(&self) -> PoolStats {
        match self.pool() {
            Some(pool) => {
                let state = pool.state();
                PoolStats {
                    connections: state.connections,
                    idle_connections: state.idle_connections,
                    max_connections: self.max_size,
                }
            }
            None => PoolStats {
                max_connections: self.max_size,
                ..Default::default()
            },
        }
    }

    fn close(&self) -> Result<()> {
        match self.pool.swap(None) {
            Some(_) => {
                debug!("Closed PostgreSQL pool");
                Ok(())
            }
            None => Err(Error::database("database pool already closed")),
        }
    }

    fn is_closed(&self) -> bool {
        self.pool.load().is_none()
    }
}

impl std::fmt::Debug for PostgresPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresPool")
            .field("max_size", &self.max_size)
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// Routes background connection errors to the log instead of stderr
#[derive(Debug)]
struct TracingErrorHandler;

impl<E: std::fmt::Display> HandleError<E> for TracingErrorHandler {
    fn handle_error(&self, error: E) {
        warn!(error = %error, "PostgreSQL pool connection error");
    }
}

fn non_zero(duration: Duration) -> Option<Duration> {
    (!duration.is_zero()).then_some(duration)
}
