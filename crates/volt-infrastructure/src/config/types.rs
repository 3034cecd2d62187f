//! Configuration types

use crate::constants::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;
use volt_domain::value_objects::duration_serde;
use volt_domain::{DatabaseConfig, HttpServiceConfig, RateLimitConfig};

/// Root application configuration
///
/// Services are keyed by the name they are registered under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Application name
    pub name: String,

    /// Application version
    pub version: String,

    /// Deployment environment (development, staging, production)
    pub environment: String,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Startup and shutdown bounds
    pub lifecycle: LifecycleConfig,

    /// Admission control
    pub rate_limit: RateLimitConfig,

    /// HTTP services by name
    pub http_services: BTreeMap<String, HttpServiceConfig>,

    /// Databases by name
    pub databases: BTreeMap<String, DatabaseConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_APP_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            environment: DEFAULT_ENVIRONMENT.to_string(),
            logging: LoggingConfig::default(),
            lifecycle: LifecycleConfig::default(),
            rate_limit: RateLimitConfig::default(),
            http_services: BTreeMap::new(),
            databases: BTreeMap::new(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Enable JSON output format
    pub json_format: bool,

    /// Log to a daily-rolling file in addition to stdout
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_output: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            json_format: false,
            file_output: None,
        }
    }
}

/// Startup and shutdown bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifecycleConfig {
    /// Time allowed for start hooks and service provisioning
    #[serde(with = "duration_serde")]
    pub startup_timeout: Duration,

    /// Time allowed for stop hooks, shutdown hooks and pool closes
    #[serde(with = "duration_serde")]
    pub shutdown_timeout: Duration,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            startup_timeout: DEFAULT_STARTUP_TIMEOUT,
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
        }
    }
}
