//! # Features Module
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 2.0.0: Reminder scheduling becomes the primary feature
//! - 1.0.0: Initial feature layout

pub mod rate_limiting;
pub mod reminders;

pub use rate_limiting::RateLimiter;
pub use reminders::{
    DeliveryError, DiscordDmSink, NewReminder, Reminder, ReminderError, ReminderScheduler,
    ReminderSink, ReminderStore, SchedulerConfig,
};
