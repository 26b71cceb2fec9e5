//! Utility command handlers
//!
//! Handles: ping, help
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.2.0
//!
//! ## Changelog
//! - 2.0.0: Reminder help text, uptime in ping
//! - 1.0.0: Extracted from command_handler.rs

use anyhow::Result;
use async_trait::async_trait;
use log::info;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::prelude::Context;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::commands::context::CommandContext;
use crate::commands::handler::{respond, SlashCommandHandler};
use crate::features::reminders::DURATION_HINT;

/// Handler for utility commands: ping, help
pub struct UtilityHandler;

#[async_trait]
impl SlashCommandHandler for UtilityHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["ping", "help"]
    }

    async fn handle(
        &self,
        ctx: Arc<CommandContext>,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
        request_id: Uuid,
    ) -> Result<()> {
        let reply = match command.data.name.as_str() {
            "ping" => format!("🏓 Pong! Uptime: {}", format_uptime(ctx.start_time.elapsed())),
            "help" => help_text(&ctx.command_prefix),
            _ => return Ok(()),
        };

        respond(serenity_ctx, command, &reply).await?;
        info!("[{request_id}] ✅ /{} completed for user {}", command.data.name, command.user.id);
        Ok(())
    }
}

fn format_uptime(uptime: Duration) -> String {
    let secs = uptime.as_secs();
    let days = secs / 86400;
    let hours = (secs % 86400) / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;

    if days > 0 {
        format!("{days}d {hours}h {minutes}m {seconds}s")
    } else if hours > 0 {
        format!("{hours}h {minutes}m {seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m {seconds}s")
    } else {
        format!("{seconds}s")
    }
}

/// Help text covering both command surfaces
pub fn help_text(prefix: &str) -> String {
    format!(
        "**Reminders**\n\
        `/remind <time> <message>` - I'll DM you about it later\n\
        `/reminders [action] [id] [page]` - List, delete or clear your reminders\n\
        `/ping` - Test bot responsiveness\n\
        \n\
        **Prefix commands** (`{prefix}reminder`, `{prefix}r` or `{prefix}reminders`)\n\
        `{prefix}r add <time> <text>` - Create a reminder\n\
        `{prefix}r list [page]` - Show your reminders\n\
        `{prefix}r delete <id>` - Delete one reminder\n\
        `{prefix}r clear` - Delete all your reminders\n\
        \n\
        {DURATION_HINT}"
    )
}
