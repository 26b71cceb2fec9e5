//! # Utility Commands
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0

use serenity::builder::CreateApplicationCommand;

pub fn create_commands() -> Vec<CreateApplicationCommand> {
    let mut ping = CreateApplicationCommand::default();
    ping.name("ping").description("Check that the bot is responsive");

    let mut help = CreateApplicationCommand::default();
    help.name("help").description("Show how to use reminders");

    vec![ping, help]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_utility_commands() {
        let names: Vec<String> = create_commands()
            .iter()
            .map(|cmd| cmd.0.get("name").unwrap().as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["ping", "help"]);
    }
}
