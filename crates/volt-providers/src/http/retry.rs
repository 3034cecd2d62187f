//! Status-driven retry decorator
//!
//! Retries are triggered only by response status membership in the
//! configured set. Transport errors (connection refused, timeouts) are
//! returned at once. Total attempts are `max_retries + 1`; when retries run
//! out the last response is returned as-is.
//!
//! Retries are method-agnostic. Retrying a POST or PATCH can duplicate side
//! effects; callers that need at-most-once semantics must disable retries
//! for that service or use idempotency keys.

use super::transport::{HttpTransport, SharedTransport};
use async_trait::async_trait;
use reqwest::{Request, Response, StatusCode};
use std::time::Duration;
use tracing::debug;
use volt_domain::HttpServiceConfig;
use volt_domain::error::Result;

/// Retry count, capped exponential backoff bounds and retried statuses
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the initial attempt
    pub max_retries: u32,
    /// Wait before the first retry
    pub min_wait: Duration,
    /// Upper bound on any single wait
    pub max_wait: Duration,
    /// Statuses that trigger a retry
    pub retry_on: Vec<u16>,
}

impl RetryPolicy {
    /// Policy described by an HTTP service configuration
    pub fn from_config(config: &HttpServiceConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            min_wait: config.retry_wait_min,
            max_wait: config.retry_wait_max,
            retry_on: config.retry_on_status.clone(),
        }
    }

    /// Whether a response with `status` should be retried
    pub fn should_retry(&self, status: StatusCode) -> bool {
        self.retry_on.contains(&status.as_u16())
    }

    /// Wait after the failed attempt number `attempt` (zero-based):
    /// `min_wait * 2^attempt`, capped at `max_wait`
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.min_wait.saturating_mul(factor).min(self.max_wait)
    }
}

/// Decorator re-sending requests that come back with a retryable status
pub struct RetryTransport {
    inner: SharedTransport,
    policy: RetryPolicy,
}

impl RetryTransport {
    /// Wrap `inner` with `policy`
    pub fn new(inner: SharedTransport, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    /// The policy in effect
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }
}

#[async_trait]
impl HttpTransport for RetryTransport {
    async fn send(&self, request: Request) -> Result<Response> {
        let mut request = request;
        let mut attempt = 0u32;

        loop {
            // Streaming bodies cannot be cloned; such requests get one attempt
            let retry_copy = if attempt < self.policy.max_retries {
                request.try_clone()
            } else {
                None
            };

            let response = self.inner.send(request).await?;
            if !self.policy.should_retry(response.status()) {
                return Ok(response);
            }

            let Some(next) = retry_copy else {
                if attempt < self.policy.max_retries {
                    debug!(
                        attempt = attempt + 1,
                        status = response.status().as_u16(),
                        "Not retrying HTTP request with a streaming body"
                    );
                }
                return Ok(response);
            };

            let wait = self.policy.backoff(attempt);
            debug!(
                attempt = attempt + 1,
                status = response.status().as_u16(),
                wait_ms = u64::try_from(wait.as_millis()).unwrap_or(u64::MAX),
                "Retrying HTTP request"
            );
            drop(response);
            tokio::time::sleep(wait).await;

            request = next;
            attempt += 1;
        }
    }
}
