//! Config-driven rate limiter

use super::sliding_window::SlidingWindowStore;
use chrono::Utc;
use std::sync::Arc;
use tracing::debug;
use volt_domain::ports::RateLimitStore;
use volt_domain::{RateLimitConfig, RateLimitDecision};

/// Applies one [`RateLimitConfig`] to a pluggable store
#[derive(Clone)]
pub struct RateLimiter {
    config: RateLimitConfig,
    store: Arc<dyn RateLimitStore>,
}

impl RateLimiter {
    /// Limiter backed by an in-memory [`SlidingWindowStore`]
    pub fn new(config: RateLimitConfig) -> Self {
        Self::with_store(config, Arc::new(SlidingWindowStore::new()))
    }

    /// Limiter backed by `store`
    pub fn with_store(config: RateLimitConfig, store: Arc<dyn RateLimitStore>) -> Self {
        Self { config, store }
    }

    /// The configuration in effect
    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Whether limiting is switched on
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Record a request for `key`; disabled limiters admit everything
    pub fn check(&self, key: &str) -> RateLimitDecision {
        if !self.config.enabled {
            return RateLimitDecision {
                allowed: true,
                limit: self.config.requests,
                remaining: self.config.requests,
                reset_at: Utc::now(),
            };
        }

        let decision = self
            .store
            .allow(key, self.config.requests, self.config.window);
        if !decision.allowed {
            debug!(key, limit = decision.limit, "Rate limit exceeded");
        }
        decision
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("config", &self.config)
            .finish()
    }
}
