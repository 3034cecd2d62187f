//! Rate limit configuration and decisions

use crate::constants::*;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::duration_serde;

/// Rate limit configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Whether rate limiting is enabled
    pub enabled: bool,

    /// Requests admitted per window
    pub requests: u32,

    /// Window length
    #[serde(with = "duration_serde")]
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            requests: RATE_LIMIT_DEFAULT_REQUESTS,
            window: RATE_LIMIT_DEFAULT_WINDOW,
        }
    }
}

/// Outcome of a single rate limit check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitDecision {
    /// Whether the request is admitted
    pub allowed: bool,
    /// Limit the decision was made against
    pub limit: u32,
    /// Requests still admitted in the current window
    pub remaining: u32,
    /// When the next slot frees up
    pub reset_at: DateTime<Utc>,
}

impl RateLimitDecision {
    /// Response headers advertising the decision
    pub fn headers(&self) -> [(&'static str, String); 3] {
        [
            (RATE_LIMIT_LIMIT_HEADER, self.limit.to_string()),
            (RATE_LIMIT_REMAINING_HEADER, self.remaining.to_string()),
            (
                RATE_LIMIT_RESET_HEADER,
                self.reset_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            ),
        ]
    }
}
