//! Reminder embed builders for Discord responses
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 2.0.0: Reminder delivery embed replaces the persona embeds
//! - 1.0.0: Extracted from duplicate implementations across command handlers

use crate::core::{truncate_for_embed, truncate_to, EMBED_FIELD_LIMIT};
use crate::features::reminders::Reminder;
use chrono::NaiveDateTime;
use serenity::builder::CreateEmbed;
use serenity::model::Timestamp;

/// Accent color for reminder embeds
pub const REMINDER_COLOR: u32 = 0x5865F2;

/// Markdown link back to the message that created the reminder
pub fn source_link(url: &str) -> String {
    truncate_to(&format!("[Jump to Message]({url})"), EMBED_FIELD_LIMIT)
}

/// Build the embed delivered when a reminder fires.
///
/// The description carries the reminder text and a single field links back to
/// the source message. `now` becomes the embed timestamp.
pub fn reminder_embed(reminder: &Reminder, now: NaiveDateTime) -> CreateEmbed {
    let mut embed = CreateEmbed::default();
    embed.title("Reminder");
    embed.color(REMINDER_COLOR);
    embed.description(truncate_for_embed(&reminder.content));
    embed.field(
        "Source Message",
        source_link(&reminder.initiator_message_url),
        false,
    );
    if let Ok(timestamp) = Timestamp::from_unix_timestamp(now.and_utc().timestamp()) {
        embed.timestamp(timestamp);
    }
    embed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::EMBED_LIMIT;
    use chrono::{Duration, NaiveDate};

    fn test_reminder(content: &str, url: &str) -> Reminder {
        let created_at = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        Reminder {
            id: Some(3),
            user_id: 11,
            created_at,
            trigger_at: created_at + Duration::hours(3),
            initiator_message_url: url.to_string(),
            content: content.to_string(),
        }
    }

    fn field_str<'a>(embed: &'a CreateEmbed, key: &str) -> Option<&'a str> {
        embed.0.get(key).and_then(|v| v.as_str())
    }

    #[test]
    fn test_reminder_embed_fields() {
        let reminder = test_reminder("feed the cat", "https://discord.com/channels/1/2/3");
        let embed = reminder_embed(&reminder, reminder.trigger_at);

        assert_eq!(field_str(&embed, "title"), Some("Reminder"));
        assert_eq!(field_str(&embed, "description"), Some("feed the cat"));
        assert!(embed.0.contains_key("timestamp"));

        let fields = embed.0.get("fields").and_then(|v| v.as_array()).unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0]["name"].as_str(), Some("Source Message"));
        assert_eq!(
            fields[0]["value"].as_str(),
            Some("[Jump to Message](https://discord.com/channels/1/2/3)")
        );
    }

    #[test]
    fn test_reminder_embed_truncates_long_content() {
        let reminder = test_reminder(&"x".repeat(5000), "https://discord.com/channels/1/2/3");
        let embed = reminder_embed(&reminder, reminder.trigger_at);

        let description = field_str(&embed, "description").unwrap();
        assert!(description.chars().count() <= EMBED_LIMIT);
    }

    #[test]
    fn test_source_link_respects_field_limit() {
        let url = format!("https://discord.com/{}", "a".repeat(2000));
        assert!(source_link(&url).chars().count() <= EMBED_FIELD_LIMIT);
    }
}
