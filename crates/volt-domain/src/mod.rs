//! # Volt Domain
//!
//! Core types shared by every layer of the service registry: the error
//! type, the port traits that providers implement, and the configuration
//! value objects consumed when services are materialized.
//!
//! ## Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`error`] | Domain error type and teardown failure aggregate |
//! | [`ports`] | Database driver/pool and rate limit store contracts |
//! | [`value_objects`] | HTTP service, database and rate limit configuration |
//! | [`constants`] | Default values taken by configuration types |

pub mod constants;
pub mod error;
pub mod ports;
pub mod value_objects;

pub use error::{Error, Result, TeardownFailure, TeardownFailures, TeardownStep};
pub use ports::{DatabaseDriver, DatabasePool, PoolStats, RateLimitStore, SharedDatabasePool};
pub use value_objects::{
    DatabaseConfig, HttpServiceConfig, RateLimitConfig, RateLimitDecision,
};
