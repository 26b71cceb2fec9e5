//! # Feature: Rate Limiting
//!
//! Sliding-window cooldown per (command scope, user) pair. Uses DashMap for
//! concurrent access from many request handlers; the same user has
//! independent budgets for different scopes.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Scope keys and retry hints for cooldown replies
//! - 1.0.0: Initial release with per-user sliding window rate limiting

use dashmap::DashMap;
use std::time::Duration;
use tokio::time::Instant;

/// Composite key for rate limiting: (scope, user_id)
type RateLimitKey = (&'static str, u64);

#[derive(Clone)]
pub struct RateLimiter {
    requests: DashMap<RateLimitKey, Vec<Instant>>,
    max_requests: usize,
    time_window: Duration,
}

impl RateLimiter {
    pub fn new(max_requests: usize, time_window: Duration) -> Self {
        RateLimiter {
            requests: DashMap::new(),
            max_requests: max_requests.max(1),
            time_window,
        }
    }

    /// Record a request and report whether it is within the limit
    pub fn check_rate_limit(&self, scope: &'static str, user_id: u64) -> bool {
        let now = Instant::now();
        let mut entry = self.requests.entry((scope, user_id)).or_default();

        entry.retain(|&time| now.duration_since(time) < self.time_window);

        if entry.len() >= self.max_requests {
            false
        } else {
            entry.push(now);
            true
        }
    }

    /// How long until the next request would be allowed (zero if allowed now)
    pub fn retry_after(&self, scope: &'static str, user_id: u64) -> Duration {
        let Some(entry) = self.requests.get(&(scope, user_id)) else {
            return Duration::ZERO;
        };

        let now = Instant::now();
        let live: Vec<&Instant> = entry
            .iter()
            .filter(|&&time| now.duration_since(time) < self.time_window)
            .collect();

        if live.len() < self.max_requests {
            return Duration::ZERO;
        }

        live.first()
            .map(|&&oldest| self.time_window.saturating_sub(now.duration_since(oldest)))
            .unwrap_or(Duration::ZERO)
    }
}
