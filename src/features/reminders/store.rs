//! Persistence seam for reminders

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDateTime;

use super::reminder::{NewReminder, Reminder};

/// Durable storage the scheduler reads from and writes to.
///
/// The store is the single source of truth and must be safe to call from the
/// dispatch loop and request handlers at the same time.
#[async_trait]
pub trait ReminderStore: Send + Sync {
    /// Insert a reminder and return its assigned id
    async fn insert_reminder(&self, reminder: &NewReminder) -> Result<i64>;

    /// Earliest reminder whose `trigger_at` is strictly before `before`
    async fn next_reminder_before(&self, before: NaiveDateTime) -> Result<Option<Reminder>>;

    /// Remove a reminder by id regardless of owner; returns whether a row was removed
    async fn delete_reminder_by_id(&self, id: i64) -> Result<bool>;

    /// Remove a reminder only if `user_id` owns it; returns whether a row was removed
    async fn delete_user_reminder(&self, id: i64, user_id: u64) -> Result<bool>;

    /// Remove every reminder owned by `user_id`; returns whether any were removed
    async fn clear_user_reminders(&self, user_id: u64) -> Result<bool>;

    /// All reminders owned by `user_id`, earliest first
    async fn get_user_reminders(&self, user_id: u64) -> Result<Vec<Reminder>>;
}
