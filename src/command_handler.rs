//! # Command Dispatch
//!
//! Entry point for Discord events: routes slash commands through the registry
//! and prefix messages through the text parser. Every request gets a uuid that
//! prefixes its log lines.
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 2.0.0: Reminder commands with a shared per-user cooldown
//! - 1.0.0: Initial monolithic handler

use anyhow::Result;
use log::{debug, info, warn};
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::channel::Message;
use serenity::prelude::Context;
use std::sync::Arc;
use uuid::Uuid;

use crate::commands::context::CommandContext;
use crate::commands::handler::respond;
use crate::commands::handlers::create_all_handlers;
use crate::commands::registry::CommandRegistry;
use crate::commands::reminders::{
    add_reply, clear_reply, cooldown_reply, delete_reply, list_reply, usage_reply,
};
use crate::commands::text::{parse_text_command, TextCommand};

#[derive(Clone)]
pub struct CommandHandler {
    context: Arc<CommandContext>,
    registry: CommandRegistry,
}

impl CommandHandler {
    pub fn new(context: CommandContext) -> Self {
        CommandHandler {
            context: Arc::new(context),
            registry: CommandRegistry::with_handlers(create_all_handlers()),
        }
    }

    pub fn context(&self) -> &CommandContext {
        &self.context
    }

    /// Handle a gateway message; anything but a reminder command is ignored
    pub async fn handle_message(&self, ctx: &Context, msg: &Message) -> Result<()> {
        if msg.author.bot {
            return Ok(());
        }

        let Some(command) = parse_text_command(&self.context.command_prefix, &msg.content) else {
            return Ok(());
        };

        let request_id = Uuid::new_v4();
        let user_id = msg.author.id.0;
        info!(
            "[{}] 📥 Text command received | {:?} | User: {} | Channel: {}",
            request_id, command, user_id, msg.channel_id
        );

        let reply = match self.context.check_cooldown(user_id) {
            Some(retry_after) => {
                warn!("[{request_id}] 🚫 Cooldown active for user: {user_id}");
                cooldown_reply(retry_after)
            }
            None => self.text_reply(command, msg).await?,
        };

        msg.channel_id.say(&ctx.http, reply).await?;
        info!("[{request_id}] ✅ Text command completed");
        Ok(())
    }

    async fn text_reply(&self, command: TextCommand, msg: &Message) -> Result<String> {
        let scheduler = &self.context.scheduler;
        let user_id = msg.author.id.0;

        match command {
            TextCommand::Add { delay, content } => {
                add_reply(scheduler, user_id, &delay, &msg.link(), &content).await
            }
            TextCommand::List { page } => list_reply(scheduler, user_id, page).await,
            TextCommand::Delete { id } => delete_reply(scheduler, user_id, id).await,
            TextCommand::Clear => clear_reply(scheduler, user_id).await,
            TextCommand::Usage => Ok(usage_reply(&self.context.command_prefix)),
            TextCommand::Invalid(reply) => Ok(reply),
        }
    }

    /// Handle a slash command interaction
    pub async fn handle_slash_command(
        &self,
        ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let request_id = Uuid::new_v4();
        let user_id = command.user.id.0;
        let guild_id = command
            .guild_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "DM".to_string());

        info!(
            "[{}] 📥 Slash command received | Command: {} | User: {} | Channel: {} | Guild: {}",
            request_id, command.data.name, user_id, command.channel_id, guild_id
        );

        let Some(handler) = self.registry.get(&command.data.name) else {
            warn!("[{}] ❓ Unknown slash command: {}", request_id, command.data.name);
            return respond(ctx, command, "❌ Unknown command.").await;
        };

        if handler.uses_cooldown() {
            debug!("[{request_id}] 🔍 Checking cooldown for user: {user_id}");
            if let Some(retry_after) = self.context.check_cooldown(user_id) {
                warn!("[{request_id}] 🚫 Cooldown active for user: {user_id}");
                return respond(ctx, command, &cooldown_reply(retry_after)).await;
            }
        }

        handler
            .handle(Arc::clone(&self.context), ctx, command, request_id)
            .await?;

        info!("[{}] ✅ Slash command /{} completed", request_id, command.data.name);
        Ok(())
    }
}
