//! # Infrastructure Layer
//!
//! The service registry and the plumbing around it.
//!
//! ## Module Categories
//!
//! ### Services & Lifecycle
//! | Module | Description |
//! |--------|-------------|
//! | [`registry`] | Named services, lazy HTTP/database factories, ordered teardown |
//! | [`host`] | Start/stop hooks and lifecycle timeouts around the registry |
//!
//! ### Configuration & Observability
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Figment-backed TOML + environment configuration |
//! | [`logging`] | Structured logging with tracing |
//! | [`constants`] | Centralized configuration constants |
//! | [`error_ext`] | Context extensions for foreign errors |

pub mod config;
pub mod constants;
pub mod error_ext;
pub mod host;
pub mod logging;
pub mod registry;

// Re-export commonly used types
pub use config::{AppConfig, ConfigLoader};
pub use error_ext::ErrorContext;
pub use host::{Host, shutdown_signal};
pub use registry::{
    FactoryState, HostServices, LifecycleContext, ServiceHandle, ServiceRef, ServiceRegistry,
};
