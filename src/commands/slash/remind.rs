//! # Reminder Commands
//!
//! `/remind` creates a reminder, `/reminders` lists, deletes or clears them.
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.2.0
//!
//! ## Changelog
//! - 2.0.0: Single-unit delays, delete and clear actions, listing pages
//! - 1.0.0: Initial implementation

use serenity::builder::CreateApplicationCommand;
use serenity::model::application::command::CommandOptionType;

/// Longest reminder text accepted from the slash surface
pub const MAX_MESSAGE_LENGTH: u16 = 1000;

const ACTION_CHOICES: &[(&str, &str)] = &[
    ("List my reminders", "list"),
    ("Delete a reminder", "delete"),
    ("Clear all my reminders", "clear"),
];

pub fn create_commands() -> Vec<CreateApplicationCommand> {
    vec![create_remind_command(), create_reminders_command()]
}

fn create_remind_command() -> CreateApplicationCommand {
    let mut command = CreateApplicationCommand::default();
    command
        .name("remind")
        .description("Get a DM reminder after a delay")
        .create_option(|option| {
            option
                .name("time")
                .description("How long to wait, e.g. 10s, 30m, 2h, 1d, 2w")
                .kind(CommandOptionType::String)
                .required(true)
                .max_length(16)
        })
        .create_option(|option| {
            option
                .name("message")
                .description("What to remind you about")
                .kind(CommandOptionType::String)
                .required(true)
                .max_length(MAX_MESSAGE_LENGTH)
        });
    command
}

fn create_reminders_command() -> CreateApplicationCommand {
    let mut command = CreateApplicationCommand::default();
    command
        .name("reminders")
        .description("List, delete or clear your pending reminders")
        .create_option(|option| {
            option
                .name("action")
                .description("What to do (default: list)")
                .kind(CommandOptionType::String)
                .required(false);
            for (name, value) in ACTION_CHOICES {
                option.add_string_choice(name, value);
            }
            option
        })
        .create_option(|option| {
            option
                .name("id")
                .description("Reminder ID to delete")
                .kind(CommandOptionType::Integer)
                .required(false)
                .min_int_value(1u64)
        })
        .create_option(|option| {
            option
                .name("page")
                .description("Listing page (default: 1)")
                .kind(CommandOptionType::Integer)
                .required(false)
                .min_int_value(1u64)
        });
    command
}
