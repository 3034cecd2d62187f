//! Provider constants

/// Name of the bundled PostgreSQL driver
pub const POSTGRES_DRIVER_NAME: &str = "postgres";

/// Query issued to verify database connectivity
pub const DB_PING_QUERY: &str = "SELECT 1";

/// Upper bound on tracked rate limit keys before expired windows are purged
pub const RATE_LIMIT_MAX_ENTRIES: usize = 10_000;

/// Counter of outbound HTTP requests, labelled by service, method and status
pub const HTTP_CLIENT_REQUESTS_METRIC: &str = "volt_http_client_requests_total";

/// Histogram of outbound HTTP request durations in seconds
pub const HTTP_CLIENT_DURATION_METRIC: &str = "volt_http_client_request_duration_seconds";

/// Layer names reported by `TransportStack::layer_names`
pub const LAYER_TRACING: &str = "tracing";
/// Retry decorator layer name
pub const LAYER_RETRY: &str = "retry";
/// Default header decorator layer name
pub const LAYER_HEADERS: &str = "headers";
