//! Shared context for command handlers
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 2.0.0: Scheduler, cooldown and prefix replace the AI services
//! - 1.0.0: Initial implementation with core shared state

use crate::features::{RateLimiter, ReminderScheduler};
use std::time::{Duration, Instant};

/// Cooldown scope shared by every reminder command, slash or prefix
pub const REMINDER_SCOPE: &str = "reminder";

/// Shared context for all command handlers
#[derive(Clone)]
pub struct CommandContext {
    pub scheduler: ReminderScheduler,
    pub rate_limiter: RateLimiter,
    pub command_prefix: String,
    pub start_time: Instant,
}

impl CommandContext {
    pub fn new(scheduler: ReminderScheduler, command_prefix: &str, cooldown: Duration) -> Self {
        Self {
            scheduler,
            rate_limiter: RateLimiter::new(1, cooldown),
            command_prefix: command_prefix.to_string(),
            start_time: Instant::now(),
        }
    }

    /// Record a reminder command for `user_id`.
    ///
    /// Returns the remaining wait when the user is still cooling down.
    pub fn check_cooldown(&self, user_id: u64) -> Option<Duration> {
        if self.rate_limiter.check_rate_limit(REMINDER_SCOPE, user_id) {
            None
        } else {
            Some(self.rate_limiter.retry_after(REMINDER_SCOPE, user_id))
        }
    }
}
