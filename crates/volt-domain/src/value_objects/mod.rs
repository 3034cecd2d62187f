//! Value Objects
//!
//! Configuration and result types that cross layer boundaries. All of them
//! are plain data: serializable, cloneable, free of I/O.

pub mod database;
pub mod duration_serde;
pub mod http_service;
pub mod rate_limit;

pub use database::DatabaseConfig;
pub use http_service::HttpServiceConfig;
pub use rate_limit::{RateLimitConfig, RateLimitDecision};
