//! # Volt - Provider Implementations
//!
//! Concrete adapters behind the ports defined in `volt-domain`, plus the
//! HTTP transport stack the registry assembles for HTTP services.
//!
//! ## Provider Categories
//!
//! | Category | Port | Implementations |
//! |----------|------|-----------------|
//! | HTTP transport | `HttpTransport` | Reqwest, Retry, Header, Tracing |
//! | Observability | `ObservabilityProvider` | TracingObservability |
//! | Database | `DatabaseDriver` / `DatabasePool` | Postgres (r2d2) |
//! | Rate limiting | `RateLimitStore` | SlidingWindowStore |
//!
//! ## Feature Flags
//!
//! ```toml
//! [dependencies]
//! volt-providers = { version = "0.1", default-features = false }
//! ```

// Re-export volt-domain types commonly used with providers
pub use volt_domain::error::{Error, Result};
pub use volt_domain::ports::{DatabaseDriver, DatabasePool, RateLimitStore};

/// Provider-specific constants
pub mod constants;

/// HTTP transports and the service client
pub mod http;

/// Transport instrumentation
pub mod observability;

/// Database driver implementations
pub mod database;

/// Rate limit store implementations
pub mod rate_limit;

pub use http::{
    HeaderTransport, HttpClient, HttpTransport, ReqwestTransport, RetryPolicy, RetryTransport,
    SharedTransport, TransportStack,
};
pub use observability::{ObservabilityProvider, TracingObservability, TracingTransport};
pub use rate_limit::{RateLimiter, SlidingWindowStore};

#[cfg(feature = "database-postgres")]
pub use database::{PostgresDriver, PostgresPool};
