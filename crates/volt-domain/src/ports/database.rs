//! Database Driver Port
//!
//! A driver turns a [`DatabaseConfig`] into a configured but unverified
//! connection pool. The registry verifies connectivity through
//! [`DatabasePool::ping`] before exposing the pool, and releases it through
//! [`DatabasePool::close`] at shutdown.
//!
//! Pools are type-erased so any driver can sit behind the same registry;
//! callers that need the concrete pool downcast it:
//!
//! ```ignore
//! let pool = registry.database("primary").expect("primary database");
//! let postgres = pool.downcast_ref::<PostgresPool>().expect("postgres pool");
//! ```

use crate::error::Result;
use crate::value_objects::DatabaseConfig;
use async_trait::async_trait;
use downcast_rs::{DowncastSync, impl_downcast};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Type alias for a shared, type-erased database pool
pub type SharedDatabasePool = Arc<dyn DatabasePool>;

/// Opens connection pools for one database driver
pub trait DatabaseDriver: Send + Sync {
    /// Driver name matched against [`DatabaseConfig::driver`]
    fn name(&self) -> &str;

    /// Build a pool with the configured size and lifetime settings
    ///
    /// Must not require the database to be reachable; connectivity is
    /// checked separately with [`DatabasePool::ping`].
    fn open(&self, config: &DatabaseConfig) -> Result<SharedDatabasePool>;
}

/// A pooled database connection source
#[async_trait]
pub trait DatabasePool: DowncastSync {
    /// Name of the driver that opened the pool
    fn driver(&self) -> &str;

    /// Verify connectivity, failing once `timeout` elapses
    async fn ping(&self, timeout: Duration) -> Result<()>;

    /// Current pool statistics
    fn stats(&self) -> PoolStats;

    /// Release the pool. Closing twice is an error.
    fn close(&self) -> Result<()>;

    /// Whether [`close`](DatabasePool::close) already ran
    fn is_closed(&self) -> bool;
}
impl_downcast!(sync DatabasePool);

/// Database pool statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolStats {
    /// Total connections currently held by the pool
    pub connections: u32,
    /// Idle connections in the pool
    pub idle_connections: u32,
    /// Maximum connections allowed
    pub max_connections: u32,
}
