//! HTTP service configuration

use crate::constants::*;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

use super::duration_serde;

/// Configures the client handed to an HTTP service constructor
///
/// # Example
///
/// ```ignore
/// use volt_domain::HttpServiceConfig;
/// use std::time::Duration;
///
/// let config = HttpServiceConfig::default()
///     .with_base_url("https://gitlab.com/api/v4")
///     .with_timeout(Duration::from_secs(10))
///     .with_retries(5, Duration::from_millis(200), Duration::from_secs(5))
///     .with_header("Authorization", "Bearer token");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpServiceConfig {
    /// Base URL relative request paths are resolved against
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Total time allowed for one call, retries and backoff included
    #[serde(with = "duration_serde")]
    pub timeout: Duration,

    /// Retries after the initial attempt; 0 disables the retry decorator
    pub max_retries: u32,

    /// Wait before the first retry; doubles on every further retry
    #[serde(with = "duration_serde")]
    pub retry_wait_min: Duration,

    /// Upper bound on the wait between retries
    #[serde(with = "duration_serde")]
    pub retry_wait_max: Duration,

    /// Response statuses that trigger a retry
    pub retry_on_status: Vec<u16>,

    /// Maximum idle connections across all hosts
    pub max_idle_conns: usize,

    /// Maximum idle connections kept per host
    pub max_idle_conns_per_host: usize,

    /// How long an idle connection stays pooled
    #[serde(with = "duration_serde")]
    pub idle_conn_timeout: Duration,

    /// Headers added to every request that does not already set them
    pub default_headers: BTreeMap<String, String>,
}

impl Default for HttpServiceConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: HTTP_DEFAULT_TIMEOUT,
            max_retries: HTTP_DEFAULT_MAX_RETRIES,
            retry_wait_min: HTTP_DEFAULT_RETRY_WAIT_MIN,
            retry_wait_max: HTTP_DEFAULT_RETRY_WAIT_MAX,
            retry_on_status: HTTP_DEFAULT_RETRY_ON_STATUS.to_vec(),
            max_idle_conns: HTTP_DEFAULT_MAX_IDLE_CONNS,
            max_idle_conns_per_host: HTTP_DEFAULT_MAX_IDLE_CONNS_PER_HOST,
            idle_conn_timeout: HTTP_DEFAULT_IDLE_CONN_TIMEOUT,
            default_headers: BTreeMap::new(),
        }
    }
}

impl HttpServiceConfig {
    /// Set the base URL for the service
    pub fn with_base_url<S: Into<String>>(mut self, url: S) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the total request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Configure retry count and backoff bounds
    pub fn with_retries(mut self, max_retries: u32, min_wait: Duration, max_wait: Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_wait_min = min_wait;
        self.retry_wait_max = max_wait;
        self
    }

    /// Disable retries entirely
    pub fn without_retries(mut self) -> Self {
        self.max_retries = 0;
        self
    }

    /// Replace the set of retried response statuses
    pub fn with_retry_on_status<I: IntoIterator<Item = u16>>(mut self, statuses: I) -> Self {
        self.retry_on_status = statuses.into_iter().collect();
        self
    }

    /// Replace the default headers
    pub fn with_headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.default_headers = headers
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self
    }

    /// Add a single default header
    pub fn with_header<K: Into<String>, V: Into<String>>(mut self, name: K, value: V) -> Self {
        self.default_headers.insert(name.into(), value.into());
        self
    }

    /// Configure idle connection pooling
    pub fn with_idle_pool(
        mut self,
        max_idle_conns: usize,
        max_idle_conns_per_host: usize,
        idle_conn_timeout: Duration,
    ) -> Self {
        self.max_idle_conns = max_idle_conns;
        self.max_idle_conns_per_host = max_idle_conns_per_host;
        self.idle_conn_timeout = idle_conn_timeout;
        self
    }

    /// Whether a response status is in the retry set
    pub fn should_retry(&self, status: u16) -> bool {
        self.retry_on_status.contains(&status)
    }

    /// Check internal consistency of the configuration
    pub fn validate(&self) -> Result<()> {
        if self.retry_wait_min > self.retry_wait_max {
            return Err(Error::config(format!(
                "retry_wait_min ({:?}) exceeds retry_wait_max ({:?})",
                self.retry_wait_min, self.retry_wait_max
            )));
        }
        if let Some(status) = self
            .retry_on_status
            .iter()
            .find(|s| !(100..=599).contains(*s))
        {
            return Err(Error::config(format!("invalid retry status code {status}")));
        }
        if self.default_headers.keys().any(|name| name.trim().is_empty()) {
            return Err(Error::config("default header names cannot be empty"));
        }
        if matches!(&self.base_url, Some(url) if url.trim().is_empty()) {
            return Err(Error::config("base_url cannot be empty when set"));
        }
        Ok(())
    }
}
