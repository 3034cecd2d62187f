//! Domain Port Interfaces
//!
//! Contracts implemented by the provider layer and consumed by the
//! registry. The registry only ever sees these traits; concrete drivers
//! and stores are plugged in at wiring time.
//!
//! - **database** - Driver and pool contracts for lazily provisioned databases
//! - **rate_limit** - Counter store contract for admission control

/// Database driver and pool ports
pub mod database;
/// Rate limit store port
pub mod rate_limit;

pub use database::{DatabaseDriver, DatabasePool, PoolStats, SharedDatabasePool};
pub use rate_limit::RateLimitStore;
