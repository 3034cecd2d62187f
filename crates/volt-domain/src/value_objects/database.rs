//! Database configuration

use crate::constants::*;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::duration_serde;

/// Database connection configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Driver name resolved against the registry's driver table
    pub driver: String,

    /// Driver-specific connection string
    pub dsn: String,

    /// Maximum number of connections in the pool
    pub max_open_conns: u32,

    /// Idle connections kept ready in the pool
    pub max_idle_conns: u32,

    /// Maximum lifetime of a connection
    #[serde(with = "duration_serde")]
    pub conn_max_lifetime: Duration,

    /// Maximum idle time of a connection
    #[serde(with = "duration_serde")]
    pub conn_max_idle_time: Duration,

    /// Timeout for establishing a single connection
    #[serde(with = "duration_serde")]
    pub connect_timeout: Duration,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            driver: DB_DEFAULT_DRIVER.to_string(),
            dsn: String::new(),
            max_open_conns: DB_DEFAULT_MAX_OPEN_CONNS,
            max_idle_conns: DB_DEFAULT_MAX_IDLE_CONNS,
            conn_max_lifetime: DB_DEFAULT_CONN_MAX_LIFETIME,
            conn_max_idle_time: DB_DEFAULT_CONN_MAX_IDLE_TIME,
            connect_timeout: DB_DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

impl DatabaseConfig {
    /// Configuration for `driver` connecting to `dsn`, other settings defaulted
    pub fn new<D: Into<String>, S: Into<String>>(driver: D, dsn: S) -> Self {
        Self {
            driver: driver.into(),
            dsn: dsn.into(),
            ..Default::default()
        }
    }

    /// PostgreSQL configuration for `dsn`
    pub fn postgres<S: Into<String>>(dsn: S) -> Self {
        Self::new(DB_DEFAULT_DRIVER, dsn)
    }

    /// Set the pool size limits
    pub fn with_pool(mut self, max_open_conns: u32, max_idle_conns: u32) -> Self {
        self.max_open_conns = max_open_conns;
        self.max_idle_conns = max_idle_conns;
        self
    }

    /// Set connection lifetime limits
    pub fn with_lifetimes(mut self, max_lifetime: Duration, max_idle_time: Duration) -> Self {
        self.conn_max_lifetime = max_lifetime;
        self.conn_max_idle_time = max_idle_time;
        self
    }

    /// Set the connect timeout
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Check the configuration before any connection is attempted
    pub fn validate(&self) -> Result<()> {
        if self.driver.trim().is_empty() {
            return Err(Error::config("database driver cannot be empty"));
        }
        if self.dsn.trim().is_empty() {
            return Err(Error::config("database dsn cannot be empty"));
        }
        if self.max_open_conns == 0 {
            return Err(Error::config("max_open_conns must be at least 1"));
        }
        if self.max_idle_conns > self.max_open_conns {
            return Err(Error::config(format!(
                "max_idle_conns ({}) exceeds max_open_conns ({})",
                self.max_idle_conns, self.max_open_conns
            )));
        }
        Ok(())
    }
}
