//! Database driver implementations
//!
//! Each driver is gated behind a feature flag. Drivers only build pools;
//! the registry decides when to open them and verifies them with a ping.
//!
//! ## Available Drivers
//!
//! | Driver | Feature | Pool |
//! |--------|---------|------|
//! | [`PostgresDriver`] | `database-postgres` | r2d2 |

#[cfg(feature = "database-postgres")]
pub mod postgres;

#[cfg(feature = "database-postgres")]
pub use postgres::{PostgresDriver, PostgresPool};
