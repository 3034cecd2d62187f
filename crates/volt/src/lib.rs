//! # Volt
//!
//! A service registry for long-running processes. Plain services are
//! registered by name; HTTP services and database pools are registered as
//! factories and materialized when the host starts, so a process never
//! serves traffic against a database it could not reach.
//!
//! ## Example
//!
//! ```ignore
//! use volt::prelude::*;
//!
//! let config = ConfigLoader::new().load()?;
//! let host = Host::new(config)
//!     .with_observability(Arc::new(TracingObservability::new()));
//!
//! let github = host.registry().register_http_service(
//!     "github",
//!     HttpServiceConfig::default().with_base_url("https://api.github.com"),
//!     |client| GithubApi::new(client),
//! )?;
//!
//! host.start().await?;
//! let api = host.registry().resolve(&github)?;
//! ```
//!
//! ## Architecture
//!
//! - `domain` - Errors, port traits and configuration value objects
//! - `providers` - HTTP transport stack, PostgreSQL driver, rate limit store
//! - `infrastructure` - Registry, host lifecycle, configuration, logging

/// Domain layer - errors, ports and value objects
///
/// Re-exports from the domain crate for convenience
pub mod domain {
    pub use volt_domain::*;
}

/// Provider layer - transports, drivers and stores
///
/// Re-exports from the providers crate for convenience
pub mod providers {
    pub use volt_providers::*;
}

/// Infrastructure layer - registry, host, config and logging
///
/// Re-exports from the infrastructure crate for convenience
pub mod infrastructure {
    pub use volt_infrastructure::*;
}

/// Everything needed to wire a host
pub mod prelude {
    pub use std::sync::Arc;
    pub use volt_domain::{
        DatabaseConfig, Error, HttpServiceConfig, RateLimitConfig, RateLimitDecision, Result,
        SharedDatabasePool,
    };
    pub use volt_infrastructure::{
        AppConfig, ConfigLoader, FactoryState, Host, HostServices, LifecycleContext,
        ServiceHandle, ServiceRef, ServiceRegistry, shutdown_signal,
    };
    pub use volt_providers::{HttpClient, RateLimiter, TracingObservability};
}

pub use domain::{Error, Result};
pub use infrastructure::{Host, ServiceRegistry};
