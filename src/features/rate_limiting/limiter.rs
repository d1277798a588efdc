//! # Feature: Rate Limiting
//!
//! Per-user sliding window admission control. Uses DashMap for thread-safe concurrent
//! access; each user's history is locked independently, so checks for different users
//! never contend.
//!
//! The limiter only reports: `is_allowed` prunes and answers, `record_request` appends.
//! Callers decide in between whether the request actually costs anything (cache hits
//! don't).
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 2.0.0: Split check and record, add compaction and retry-after hint
//! - 1.0.0: Initial release with per-user sliding window rate limiting

use dashmap::DashMap;
use log::debug;
use std::time::Duration;
use tokio::time::Instant;

/// Platform-assigned numeric id of the user issuing a request
pub type Identity = u64;

pub struct RateLimiter {
    requests: DashMap<Identity, Vec<Instant>>,
    max_requests: usize,
    time_window: Duration,
}

impl RateLimiter {
    pub fn new(max_requests: usize, time_window: Duration) -> Self {
        RateLimiter {
            requests: DashMap::new(),
            max_requests,
            time_window,
        }
    }

    /// Whether `identity` may make another request right now.
    ///
    /// Prunes timestamps that have left the window but never records an attempt.
    pub fn is_allowed(&self, identity: Identity) -> bool {
        let now = Instant::now();
        match self.requests.get_mut(&identity) {
            Some(mut history) => {
                history.retain(|&time| now.duration_since(time) < self.time_window);
                history.len() < self.max_requests
            }
            None => self.max_requests > 0,
        }
    }

    /// Record an admitted request for `identity`
    pub fn record_request(&self, identity: Identity) {
        let now = Instant::now();
        let mut history = self.requests.entry(identity).or_default();
        history.retain(|&time| now.duration_since(time) < self.time_window);
        history.push(now);
    }

    /// Time until the oldest in-window request for `identity` expires.
    ///
    /// Returns `None` when the identity is currently allowed.
    pub fn retry_after(&self, identity: Identity) -> Option<Duration> {
        if self.is_allowed(identity) {
            return None;
        }
        let now = Instant::now();
        let history = self.requests.get(&identity)?;
        let oldest = *history.first()?;
        Some(self.time_window.saturating_sub(now.duration_since(oldest)))
    }

    /// Drop identities with no requests left in the window.
    ///
    /// Returns the number of identities removed.
    pub fn compact(&self) -> usize {
        let now = Instant::now();
        let before = self.requests.len();
        self.requests.retain(|_, history| {
            history.retain(|&time| now.duration_since(time) < self.time_window);
            !history.is_empty()
        });
        let removed = before.saturating_sub(self.requests.len());
        if removed > 0 {
            debug!("Rate limiter compaction dropped {removed} idle identities");
        }
        removed
    }

    /// Number of identities currently holding history
    pub fn tracked_identities(&self) -> usize {
        self.requests.len()
    }
}
