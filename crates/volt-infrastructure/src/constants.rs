//! Infrastructure layer constants
//!
//! Service defaults live in `volt_domain::constants`; these cover the
//! configuration, logging and lifecycle plumbing.

use std::time::Duration;

// ============================================================================
// CONFIGURATION CONSTANTS
// ============================================================================

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "volt.toml";

/// Default configuration directory name
pub const DEFAULT_CONFIG_DIR: &str = "volt";

/// Environment variable prefix for configuration
pub const CONFIG_ENV_PREFIX: &str = "VOLT";

/// Separator between nested keys in environment variables (`VOLT_LOGGING__LEVEL`)
pub const CONFIG_ENV_SEPARATOR: &str = "__";

/// Default application name
pub const DEFAULT_APP_NAME: &str = "volt";

/// Default deployment environment
pub const DEFAULT_ENVIRONMENT: &str = "development";

// ============================================================================
// LOGGING CONSTANTS
// ============================================================================

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable overriding the log filter
pub const LOG_FILTER_ENV: &str = "VOLT_LOG";

// ============================================================================
// LIFECYCLE CONSTANTS
// ============================================================================

/// Default bound on host startup, hooks and service provisioning included
pub const DEFAULT_STARTUP_TIMEOUT: Duration = Duration::from_secs(30);

/// Default bound on host shutdown, hooks and pool closes included
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(15);
