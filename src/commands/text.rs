//! # Prefix Commands
//!
//! Parses `{prefix}reminder <subcommand> ...` messages. The group also answers
//! to `r` and `reminders`.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.0.0: Reminder group with add, list, delete and clear

const GROUP_NAMES: &[&str] = &["reminder", "r", "reminders"];
const ADD_NAMES: &[&str] = &["add", "create"];
const LIST_NAMES: &[&str] = &["list", "ls"];
const DELETE_NAMES: &[&str] = &["delete", "del", "remove", "rmv"];
const CLEAR_NAMES: &[&str] = &["clear", "clean"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextCommand {
    Add { delay: String, content: String },
    List { page: usize },
    Delete { id: i64 },
    Clear,
    /// Group used without a known subcommand
    Usage,
    /// Known subcommand with unusable arguments; carries the reply
    Invalid(String),
}

/// Split off the first whitespace-separated word
fn next_word(input: &str) -> Option<(&str, &str)> {
    let input = input.trim_start();
    if input.is_empty() {
        return None;
    }
    match input.split_once(char::is_whitespace) {
        Some((word, rest)) => Some((word, rest.trim_start())),
        None => Some((input, "")),
    }
}

fn is_one_of(word: &str, names: &[&str]) -> bool {
    names.iter().any(|name| name.eq_ignore_ascii_case(word))
}

/// Parse a message as a reminder command; `None` if it isn't one
pub fn parse_text_command(prefix: &str, message: &str) -> Option<TextCommand> {
    if prefix.is_empty() {
        return None;
    }
    let body = message.trim_start().strip_prefix(prefix)?;
    let (group, rest) = next_word(body)?;

    // The prefix must be attached to the group name
    if body.starts_with(char::is_whitespace) || !is_one_of(group, GROUP_NAMES) {
        return None;
    }

    let Some((sub, args)) = next_word(rest) else {
        return Some(TextCommand::Usage);
    };

    let command = if is_one_of(sub, ADD_NAMES) {
        match next_word(args) {
            Some((delay, content)) if !content.trim().is_empty() => TextCommand::Add {
                delay: delay.to_string(),
                content: content.trim_end().to_string(),
            },
            _ => TextCommand::Invalid(format!(
                "❌ Usage: `{prefix}reminder add <time> <text>`, e.g. `{prefix}reminder add 2h stretch`"
            )),
        }
    } else if is_one_of(sub, LIST_NAMES) {
        match next_word(args) {
            None => TextCommand::List { page: 1 },
            Some((page, _)) => match page.parse::<usize>() {
                Ok(page) => TextCommand::List { page },
                Err(_) => TextCommand::Invalid(format!("❌ `{page}` is not a valid page number.")),
            },
        }
    } else if is_one_of(sub, DELETE_NAMES) {
        match next_word(args) {
            None => TextCommand::Invalid(format!(
                "❌ Usage: `{prefix}reminder delete <id>`"
            )),
            Some((id, _)) => match id.trim_start_matches('#').parse::<i64>() {
                Ok(id) => TextCommand::Delete { id },
                Err(_) => TextCommand::Invalid(format!("❌ `{id}` is not a valid reminder id.")),
            },
        }
    } else if is_one_of(sub, CLEAR_NAMES) {
        TextCommand::Clear
    } else {
        TextCommand::Usage
    };

    Some(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ignores_other_messages() {
        assert_eq!(parse_text_command("!", "hello there"), None);
        assert_eq!(parse_text_command("!", "!ping"), None);
        assert_eq!(parse_text_command("!", "! reminder list"), None);
        assert_eq!(parse_text_command("!", "!reminderx list"), None);
        assert_eq!(parse_text_command("", "reminder list"), None);
    }

    #[test]
    fn test_group_aliases() {
        for group in ["reminder", "r", "reminders", "REMINDER"] {
            assert_eq!(
                parse_text_command("!", &format!("!{group} clear")),
                Some(TextCommand::Clear)
            );
        }
    }

    #[test]
    fn test_missing_or_unknown_subcommand() {
        assert_eq!(parse_text_command("!", "!reminder"), Some(TextCommand::Usage));
        assert_eq!(parse_text_command("!", "!r   "), Some(TextCommand::Usage));
        assert_eq!(parse_text_command("!", "!r snooze 5m"), Some(TextCommand::Usage));
    }

    #[test]
    fn test_add_keeps_content_text() {
        assert_eq!(
            parse_text_command("!", "!r add 2d  call   mom\nabout sunday "),
            Some(TextCommand::Add {
                delay: "2d".to_string(),
                content: "call   mom\nabout sunday".to_string(),
            })
        );
        assert_eq!(
            parse_text_command("t.", "t.reminder create 10s tea"),
            Some(TextCommand::Add {
                delay: "10s".to_string(),
                content: "tea".to_string(),
            })
        );
    }

    #[test]
    fn test_add_without_text_is_invalid() {
        assert!(matches!(
            parse_text_command("!", "!r add 2d"),
            Some(TextCommand::Invalid(_))
        ));
        assert!(matches!(
            parse_text_command("!", "!r add"),
            Some(TextCommand::Invalid(_))
        ));
    }

    #[test]
    fn test_list_with_optional_page() {
        assert_eq!(
            parse_text_command("!", "!r ls"),
            Some(TextCommand::List { page: 1 })
        );
        assert_eq!(
            parse_text_command("!", "!reminders list 3"),
            Some(TextCommand::List { page: 3 })
        );
        assert!(matches!(
            parse_text_command("!", "!r list two"),
            Some(TextCommand::Invalid(_))
        ));
    }

    #[test]
    fn test_delete_aliases_and_ids() {
        for alias in ["delete", "del", "remove", "rmv"] {
            assert_eq!(
                parse_text_command("!", &format!("!r {alias} 42")),
                Some(TextCommand::Delete { id: 42 })
            );
        }
        assert_eq!(
            parse_text_command("!", "!r del #7"),
            Some(TextCommand::Delete { id: 7 })
        );
        assert!(matches!(
            parse_text_command("!", "!r del abc"),
            Some(TextCommand::Invalid(_))
        ));
        assert!(matches!(
            parse_text_command("!", "!r del"),
            Some(TextCommand::Invalid(_))
        ));
    }

    #[test]
    fn test_clear_aliases() {
        assert_eq!(parse_text_command("!", "!r clean"), Some(TextCommand::Clear));
    }
}
