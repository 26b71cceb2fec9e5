//! # Reminders Feature
//!
//! Persistent one-time reminders delivered by direct message.
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

pub mod clock;
pub mod duration;
pub mod reminder;
pub mod scheduler;
pub mod sink;
pub mod store;

pub use clock::{Clock, SystemClock};
pub use duration::{format_duration, humanize, parse_duration, DurationParseError, DURATION_HINT};
pub use reminder::{NewReminder, Reminder};
pub use scheduler::{ReminderError, ReminderScheduler, SchedulerConfig};
pub use sink::{DeliveryError, DiscordDmSink, ReminderSink};
pub use store::ReminderStore;
