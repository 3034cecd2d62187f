//! Rate limit store implementations
//!
//! - [`SlidingWindowStore`] - in-memory sliding log, one deque of hit instants per key
//! - [`RateLimiter`] - applies a [`RateLimitConfig`](volt_domain::RateLimitConfig) to any store

pub mod limiter;
pub mod sliding_window;

pub use limiter::RateLimiter;
pub use sliding_window::SlidingWindowStore;
