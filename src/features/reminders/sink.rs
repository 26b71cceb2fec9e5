//! Reminder delivery
//!
//! Delivery happens after the reminder has already been removed from the
//! store, so an unreachable recipient is final and never retried.

use async_trait::async_trait;
use log::debug;
use serenity::http::error::Error as HttpError;
use serenity::http::Http;
use serenity::model::id::UserId;
use serenity::Error as SerenityError;
use std::sync::Arc;
use thiserror::Error;

use super::clock::Clock;
use super::duration::humanize;
use super::reminder::Reminder;
use crate::core::embeds::reminder_embed;

#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The recipient can't be messaged (DMs closed, account gone)
    #[error("recipient {0} is unreachable")]
    Unreachable(u64),
    /// The delivery channel itself failed; the dispatch loop restarts
    #[error("transient delivery failure: {0}")]
    Transient(#[source] anyhow::Error),
}

/// Somewhere to send a reminder once it is due
#[async_trait]
pub trait ReminderSink: Send + Sync {
    async fn deliver(&self, reminder: &Reminder) -> Result<(), DeliveryError>;
}

/// Delivers reminders as direct messages through the Discord REST API
pub struct DiscordDmSink {
    http: Arc<Http>,
    clock: Arc<dyn Clock>,
}

impl DiscordDmSink {
    pub fn new(http: Arc<Http>, clock: Arc<dyn Clock>) -> Self {
        Self { http, clock }
    }

    /// Text shown above the reminder embed
    pub fn intro_line(reminder: &Reminder, now: chrono::NaiveDateTime) -> String {
        format!(
            "You asked me {} to remind you about this!",
            humanize(reminder.created_at - now)
        )
    }

    fn classify(user_id: u64, err: SerenityError) -> DeliveryError {
        if let SerenityError::Http(http_err) = &err {
            if let HttpError::UnsuccessfulRequest(response) = &**http_err {
                if is_unreachable_status(response.status_code.as_u16()) {
                    return DeliveryError::Unreachable(user_id);
                }
            }
        }
        DeliveryError::Transient(err.into())
    }
}

/// 403: DMs closed or no shared guild, 404: unknown user
fn is_unreachable_status(status: u16) -> bool {
    matches!(status, 403 | 404)
}

#[async_trait]
impl ReminderSink for DiscordDmSink {
    async fn deliver(&self, reminder: &Reminder) -> Result<(), DeliveryError> {
        let http: &Http = &self.http;
        let now = self.clock.now();
        let content = Self::intro_line(reminder, now);
        let embed = reminder_embed(reminder, now);

        let dm = UserId(reminder.user_id)
            .create_dm_channel(http)
            .await
            .map_err(|e| Self::classify(reminder.user_id, e))?;

        dm.send_message(http, |m| m.content(&content).set_embed(embed))
            .await
            .map_err(|e| Self::classify(reminder.user_id, e))?;

        debug!("Sent {reminder} via DM");
        Ok(())
    }
}
