//! Application configuration
//!
//! Typed configuration loaded through figment, with services declared by
//! name so the host can register them without code.

pub mod loader;
pub mod types;

pub use loader::{ConfigLoader, validate_app_config};
pub use types::{AppConfig, LifecycleConfig, LoggingConfig};
