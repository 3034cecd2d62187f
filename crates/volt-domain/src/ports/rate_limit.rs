//! Rate Limit Store Port
//!
//! Pluggable counter storage for admission control. The registry and the
//! rest of the framework only depend on this contract; the reference
//! in-memory store lives in `volt_providers::rate_limit`.
//!
//! Implementations must:
//! - track a counter per key whose expiry is tied to `window`
//! - be safe under concurrent calls from many request handlers
//! - forget hits once `window` has elapsed

use crate::value_objects::RateLimitDecision;
use std::time::Duration;

/// Counter store consulted once per admitted-or-rejected request
pub trait RateLimitStore: Send + Sync {
    /// Record a hit for `key` and decide whether it fits in `limit` per `window`
    ///
    /// Rejected hits are not counted against the key.
    fn allow(&self, key: &str, limit: u32, window: Duration) -> RateLimitDecision;
}
