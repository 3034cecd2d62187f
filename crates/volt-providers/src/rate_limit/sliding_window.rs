//! In-memory sliding window store
//!
//! Each key keeps the instants of its admitted hits. A hit is admitted when
//! fewer than `limit` hits fall inside the trailing `window`, so the budget
//! frees up one slot at a time instead of all at once at a window edge.

use crate::constants::RATE_LIMIT_MAX_ENTRIES;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::collections::VecDeque;
use std::time::{Duration, Instant};
use volt_domain::ports::RateLimitStore;
use volt_domain::RateLimitDecision;

#[derive(Debug)]
struct Window {
    length: Duration,
    hits: VecDeque<Instant>,
}

impl Window {
    fn new(length: Duration) -> Self {
        Self {
            length,
            hits: VecDeque::new(),
        }
    }

    fn expire(&mut self, now: Instant) {
        while let Some(&oldest) = self.hits.front() {
            if now.saturating_duration_since(oldest) >= self.length {
                self.hits.pop_front();
            } else {
                break;
            }
        }
    }

    fn is_expired(&self, now: Instant) -> bool {
        self.hits
            .back()
            .is_none_or(|&last| now.saturating_duration_since(last) >= self.length)
    }
}

/// Sliding-log rate limit store for a single process
///
/// Safe for concurrent use: each key lives in its own dashmap shard entry.
/// The number of tracked keys is bounded by `max_entries`; when the bound is
/// hit, expired windows are purged first and the stalest key goes next.
#[derive(Debug)]
pub struct SlidingWindowStore {
    windows: DashMap<String, Window>,
    max_entries: usize,
}

impl Default for SlidingWindowStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SlidingWindowStore {
    /// Store bounded by the default key count
    pub fn new() -> Self {
        Self::with_max_entries(RATE_LIMIT_MAX_ENTRIES)
    }

    /// Store tracking at most `max_entries` keys
    pub fn with_max_entries(max_entries: usize) -> Self {
        Self {
            windows: DashMap::new(),
            max_entries: max_entries.max(1),
        }
    }

    /// Number of keys currently tracked
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    /// Whether no key is tracked
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Forget every key whose hits have all aged out
    pub fn purge_expired(&self) {
        let now = Instant::now();
        self.windows.retain(|_, window| !window.is_expired(now));
    }

    /// Forget a single key
    pub fn reset(&self, key: &str) {
        self.windows.remove(key);
    }

    fn make_room(&self) {
        if self.windows.len() < self.max_entries {
            return;
        }
        self.purge_expired();
        if self.windows.len() < self.max_entries {
            return;
        }

        let stalest = self
            .windows
            .iter()
            .min_by_key(|entry| entry.value().hits.back().copied())
            .map(|entry| entry.key().clone());
        if let Some(key) = stalest {
            self.windows.remove(&key);
        }
    }
}

impl RateLimitStore for SlidingWindowStore {
    fn allow(&self, key: &str, limit: u32, window: Duration) -> RateLimitDecision {
        if !self.windows.contains_key(key) {
            self.make_room();
        }

        let now = Instant::now();
        let mut entry = self
            .windows
            .entry(key.to_string())
            .or_insert_with(|| Window::new(window));
        if entry.length != window {
            *entry = Window::new(window);
        }
        entry.expire(now);

        let used = u32::try_from(entry.hits.len()).unwrap_or(u32::MAX);
        let allowed = used < limit;
        if allowed {
            entry.hits.push_back(now);
        }
        let remaining = limit.saturating_sub(used + u32::from(allowed));

        let until_reset = entry
            .hits
            .front()
            .and_then(|&oldest| oldest.checked_add(window))
            .map(|reset| reset.saturating_duration_since(now))
            .unwrap_or(window);
        drop(entry);

        let reset_at = chrono::Duration::from_std(until_reset)
            .ok()
            .and_then(|delta| Utc::now().checked_add_signed(delta))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        RateLimitDecision {
            allowed,
            limit,
            remaining,
            reset_at,
        }
    }
}
