//! Reminder replies shared by slash and prefix commands
//!
//! Each function runs one reminder operation and returns the text to send
//! back. The Discord adapters only deliver it.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.0.0: Extracted from the slash and prefix handlers

use anyhow::Result;
use log::debug;
use std::time::Duration;

use crate::core::{paginate, truncate_for_message, truncate_to};
use crate::features::reminders::{humanize, ReminderError, ReminderScheduler, DURATION_HINT};

/// Reminders shown per listing page
pub const REMINDERS_PER_PAGE: usize = 5;

/// Longest content preview shown in a listing line
const PREVIEW_LIMIT: usize = 60;

/// Create a reminder and describe the outcome
pub async fn add_reply(
    scheduler: &ReminderScheduler,
    user_id: u64,
    delay: &str,
    initiator_message_url: &str,
    content: &str,
) -> Result<String> {
    let content = content.trim();
    if content.is_empty() {
        return Ok("❌ Tell me what you want to be reminded about.".to_string());
    }

    match scheduler
        .create(user_id, delay, initiator_message_url, content)
        .await
    {
        Ok(reminder) => {
            let when = humanize(reminder.trigger_at - reminder.created_at);
            Ok(match reminder.id {
                Some(id) => format!("👌 I will remind you about it {when} (#{id})"),
                None => format!("👌 I will remind you about it {when}"),
            })
        }
        Err(ReminderError::InvalidDuration(e)) => {
            debug!("Rejected delay '{delay}' from user {user_id}: {e}");
            Ok(format!("❌ {}. {DURATION_HINT}", capitalize(&e.to_string())))
        }
        Err(ReminderError::OutOfRange) => {
            Ok("❌ That time is too far in the future.".to_string())
        }
        Err(ReminderError::Store(e)) => Err(e),
    }
}

/// One page of the user's pending reminders, earliest first
pub async fn list_reply(scheduler: &ReminderScheduler, user_id: u64, page: usize) -> Result<String> {
    let reminders = scheduler.list(user_id).await?;
    if reminders.is_empty() {
        return Ok("❌ You don't have any reminders set.".to_string());
    }

    let now = scheduler.now();
    let page = paginate(&reminders, REMINDERS_PER_PAGE, page);

    let mut reply = String::from("⏰ **Reminders List**\n\n");
    for reminder in page.items {
        let id = reminder.id.unwrap_or_default();
        let preview = truncate_to(&reminder.content.replace('\n', " "), PREVIEW_LIMIT);
        reply.push_str(&format!(
            "**(ID: {id})** {}\n> {preview}\n",
            humanize(reminder.trigger_at - now)
        ));
    }
    reply.push_str(&format!(
        "\nPage {}/{} ({} total)",
        page.number,
        page.total,
        reminders.len()
    ));

    Ok(truncate_for_message(&reply))
}

/// Delete one of the user's reminders
pub async fn delete_reply(scheduler: &ReminderScheduler, user_id: u64, id: i64) -> Result<String> {
    if scheduler.delete(id, user_id).await? {
        Ok(format!("👌 You have successfully deleted **#{id}** reminder."))
    } else {
        Ok("❌ You tried to delete non-existing or someone else's reminder.".to_string())
    }
}

/// Delete all of the user's reminders
pub async fn clear_reply(scheduler: &ReminderScheduler, user_id: u64) -> Result<String> {
    if scheduler.clear(user_id).await? {
        Ok("👌 You have successfully cleared your reminders list.".to_string())
    } else {
        Ok("❌ You don't have any reminders.".to_string())
    }
}

/// Shown when a user is still on cooldown
pub fn cooldown_reply(retry_after: Duration) -> String {
    format!(
        "⏳ You're using reminder commands too quickly. Try again in {:.1}s.",
        retry_after.as_secs_f64()
    )
}

/// Shown when the reminder group is used without a known subcommand
pub fn usage_reply(prefix: &str) -> String {
    format!(
        "❌ You haven't used any subcommand. Try `{prefix}reminder add <time> <text>`, \
         `{prefix}reminder list [page]`, `{prefix}reminder delete <id>` or `{prefix}reminder clear`."
    )
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
