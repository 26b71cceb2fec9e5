// Core layer - shared types and configuration
pub mod core;

// Features layer - reminders and rate limiting
pub mod features;

// Infrastructure
pub mod database;

// Application layer
pub mod command_handler;
pub mod commands;

pub use core::Config;
pub use database::Database;

pub use features::{
    // Rate limiting
    RateLimiter,
    // Reminders
    DeliveryError, DiscordDmSink, NewReminder, Reminder, ReminderError, ReminderScheduler,
    ReminderSink, ReminderStore, SchedulerConfig,
};
