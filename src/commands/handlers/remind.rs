//! Reminder command handlers
//!
//! Handles: remind, reminders
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.2.0
//!
//! ## Changelog
//! - 2.0.0: Backed by the reminder scheduler; replies shared with prefix commands
//! - 1.0.0: Extracted from command_handler.rs

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::{debug, info};
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::id::{ChannelId, GuildId};
use serenity::prelude::Context;
use std::sync::Arc;
use uuid::Uuid;

use crate::commands::context::CommandContext;
use crate::commands::handler::{respond, SlashCommandHandler};
use crate::commands::reminders::{add_reply, clear_reply, delete_reply, list_reply};
use crate::commands::slash::{get_integer_option, get_string_option};

/// Handler for /remind and /reminders
pub struct RemindHandler;

/// Link to the channel a slash command was used in
pub fn interaction_source_url(guild_id: Option<GuildId>, channel_id: ChannelId) -> String {
    match guild_id {
        Some(guild_id) => format!("https://discord.com/channels/{guild_id}/{channel_id}"),
        None => format!("https://discord.com/channels/@me/{channel_id}"),
    }
}

#[async_trait]
impl SlashCommandHandler for RemindHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["remind", "reminders"]
    }

    fn uses_cooldown(&self) -> bool {
        true
    }

    async fn handle(
        &self,
        ctx: Arc<CommandContext>,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
        request_id: Uuid,
    ) -> Result<()> {
        let reply = match command.data.name.as_str() {
            "remind" => self.handle_remind(&ctx, command, request_id).await?,
            "reminders" => self.handle_reminders(&ctx, command, request_id).await?,
            _ => return Ok(()),
        };

        respond(serenity_ctx, command, &reply).await?;
        debug!("[{request_id}] ✅ Reminder reply sent");
        Ok(())
    }
}

impl RemindHandler {
    /// /remind time:<delay> message:<text>
    async fn handle_remind(
        &self,
        ctx: &CommandContext,
        command: &ApplicationCommandInteraction,
        request_id: Uuid,
    ) -> Result<String> {
        let time = get_string_option(&command.data.options, "time")
            .ok_or_else(|| anyhow!("Missing time parameter"))?;
        let message = get_string_option(&command.data.options, "message")
            .ok_or_else(|| anyhow!("Missing message parameter"))?;
        let user_id = command.user.id.0;

        info!("[{request_id}] ⏰ Creating reminder for user {user_id} in '{time}'");

        let source = interaction_source_url(command.guild_id, command.channel_id);
        add_reply(&ctx.scheduler, user_id, &time, &source, &message).await
    }

    /// /reminders action:[list|delete|clear] id:<int> page:<int>
    async fn handle_reminders(
        &self,
        ctx: &CommandContext,
        command: &ApplicationCommandInteraction,
        request_id: Uuid,
    ) -> Result<String> {
        let user_id = command.user.id.0;
        let action = get_string_option(&command.data.options, "action")
            .unwrap_or_else(|| "list".to_string());

        debug!("[{request_id}] 📋 Reminders action '{action}' for user {user_id}");

        match action.as_str() {
            "delete" => match get_integer_option(&command.data.options, "id") {
                Some(id) => delete_reply(&ctx.scheduler, user_id, id).await,
                None => Ok(
                    "❌ Please provide a reminder ID to delete. Use `/reminders` to see your reminder IDs."
                        .to_string(),
                ),
            },
            "clear" => clear_reply(&ctx.scheduler, user_id).await,
            _ => {
                let page = get_integer_option(&command.data.options, "page")
                    .and_then(|page| usize::try_from(page).ok())
                    .unwrap_or(1);
                list_reply(&ctx.scheduler, user_id, page).await
            }
        }
    }
}
