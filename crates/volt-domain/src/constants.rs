//! Domain constants
//!
//! Default values for service configuration. Infrastructure-level constants
//! (config file names, environment prefixes) live in `volt_infrastructure::constants`.

use std::time::Duration;

// ============================================================================
// HTTP SERVICE CONSTANTS
// ============================================================================

/// Default total timeout for an outbound HTTP call, retries included
pub const HTTP_DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default number of retries after the initial attempt
pub const HTTP_DEFAULT_MAX_RETRIES: u32 = 3;

/// Default base wait between retry attempts
pub const HTTP_DEFAULT_RETRY_WAIT_MIN: Duration = Duration::from_millis(100);

/// Default cap on the wait between retry attempts
pub const HTTP_DEFAULT_RETRY_WAIT_MAX: Duration = Duration::from_secs(2);

/// Response statuses retried by default (bad gateway, unavailable, gateway timeout)
pub const HTTP_DEFAULT_RETRY_ON_STATUS: [u16; 3] = [502, 503, 504];

/// Default maximum idle connections across all hosts
pub const HTTP_DEFAULT_MAX_IDLE_CONNS: usize = 100;

/// Default maximum idle connections kept per host
pub const HTTP_DEFAULT_MAX_IDLE_CONNS_PER_HOST: usize = 10;

/// Default idle connection timeout
pub const HTTP_DEFAULT_IDLE_CONN_TIMEOUT: Duration = Duration::from_secs(90);

// ============================================================================
// DATABASE CONSTANTS
// ============================================================================

/// Driver used when a database configuration names none
pub const DB_DEFAULT_DRIVER: &str = "postgres";

/// Default maximum open connections in a pool
pub const DB_DEFAULT_MAX_OPEN_CONNS: u32 = 25;

/// Default number of idle connections kept warm
pub const DB_DEFAULT_MAX_IDLE_CONNS: u32 = 10;

/// Default maximum lifetime of a pooled connection (5 minutes)
pub const DB_DEFAULT_CONN_MAX_LIFETIME: Duration = Duration::from_secs(300);

/// Default maximum idle time of a pooled connection (5 minutes)
pub const DB_DEFAULT_CONN_MAX_IDLE_TIME: Duration = Duration::from_secs(300);

/// Default timeout for establishing a connection
pub const DB_DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

// ============================================================================
// RATE LIMIT CONSTANTS
// ============================================================================

/// Default requests admitted per window
pub const RATE_LIMIT_DEFAULT_REQUESTS: u32 = 100;

/// Default rate limit window
pub const RATE_LIMIT_DEFAULT_WINDOW: Duration = Duration::from_secs(60);

/// Rate limit header carrying the configured limit
pub const RATE_LIMIT_LIMIT_HEADER: &str = "X-RateLimit-Limit";

/// Rate limit header carrying the remaining budget
pub const RATE_LIMIT_REMAINING_HEADER: &str = "X-RateLimit-Remaining";

/// Rate limit header carrying the reset instant (RFC 3339)
pub const RATE_LIMIT_RESET_HEADER: &str = "X-RateLimit-Reset";
