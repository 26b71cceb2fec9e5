//! Reminder delay grammar and human-readable durations
//!
//! A delay is a single positive magnitude followed by a unit:
//! `s` seconds, `m` minutes, `h` hours, `d` days, `w` weeks (`10s`, `2d`, `3w`).

use chrono::Duration;
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

const SECONDS_PER_MINUTE: i64 = 60;
const SECONDS_PER_HOUR: i64 = 60 * SECONDS_PER_MINUTE;
const SECONDS_PER_DAY: i64 = 24 * SECONDS_PER_HOUR;
const SECONDS_PER_WEEK: i64 = 7 * SECONDS_PER_DAY;

/// Usage hint shown alongside parse errors
pub const DURATION_HINT: &str = "Use a number followed by s, m, h, d or w, e.g. `10s`, `30m`, `2h`, `1d`, `2w`.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationParseError {
    #[error("no time given")]
    Empty,
    #[error("time can't be negative")]
    Negative,
    #[error("'{0}' is not a valid time")]
    InvalidFormat(String),
    #[error("time must be greater than zero")]
    Zero,
    #[error("'{0}' is too far in the future")]
    TooLarge(String),
}

fn grammar() -> &'static Regex {
    static GRAMMAR: OnceLock<Regex> = OnceLock::new();
    GRAMMAR.get_or_init(|| Regex::new(r"^([0-9]+)([smhdw])$").expect("duration grammar is valid"))
}

/// Parse a delay such as `30m` into a positive duration
pub fn parse_duration(input: &str) -> Result<Duration, DurationParseError> {
    let normalized = input.trim().to_lowercase();

    if normalized.is_empty() {
        return Err(DurationParseError::Empty);
    }
    if normalized.starts_with('-') {
        return Err(DurationParseError::Negative);
    }

    let captures = grammar()
        .captures(&normalized)
        .ok_or_else(|| DurationParseError::InvalidFormat(input.trim().to_string()))?;

    let too_large = || DurationParseError::TooLarge(input.trim().to_string());

    let magnitude: i64 = captures[1].parse().map_err(|_| too_large())?;
    if magnitude == 0 {
        return Err(DurationParseError::Zero);
    }

    let unit_seconds = match &captures[2] {
        "s" => 1,
        "m" => SECONDS_PER_MINUTE,
        "h" => SECONDS_PER_HOUR,
        "d" => SECONDS_PER_DAY,
        "w" => SECONDS_PER_WEEK,
        other => return Err(DurationParseError::InvalidFormat(other.to_string())),
    };

    let seconds = magnitude.checked_mul(unit_seconds).ok_or_else(too_large)?;
    Duration::try_seconds(seconds).ok_or_else(too_large)
}

fn plural(value: i64, unit: &str) -> String {
    format!("{} {}{}", value, unit, if value == 1 { "" } else { "s" })
}

/// Format a non-negative number of seconds with at most two units
pub fn format_duration(seconds: i64) -> String {
    let seconds = seconds.max(0);
    if seconds < SECONDS_PER_MINUTE {
        plural(seconds, "second")
    } else if seconds < SECONDS_PER_HOUR {
        plural(seconds / SECONDS_PER_MINUTE, "minute")
    } else if seconds < SECONDS_PER_DAY {
        let hours = seconds / SECONDS_PER_HOUR;
        let mins = (seconds % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE;
        if mins > 0 {
            format!("{} {}", plural(hours, "hour"), plural(mins, "minute"))
        } else {
            plural(hours, "hour")
        }
    } else {
        let days = seconds / SECONDS_PER_DAY;
        let hours = (seconds % SECONDS_PER_DAY) / SECONDS_PER_HOUR;
        if hours > 0 {
            format!("{} {}", plural(days, "day"), plural(hours, "hour"))
        } else {
            plural(days, "day")
        }
    }
}

/// Relative phrasing for a signed offset from now: "in 2 days", "3 hours ago"
pub fn humanize(delta: Duration) -> String {
    let seconds = delta.num_seconds();
    if seconds == 0 {
        "just now".to_string()
    } else if seconds > 0 {
        format!("in {}", format_duration(seconds))
    } else {
        format!("{} ago", format_duration(-seconds))
    }
}
