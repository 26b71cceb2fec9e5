//! Environment-driven bot configuration
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.0.0: Initial release with Discord, database, logging and command settings

use anyhow::{Context, Result};
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    /// Development guild for instant slash command registration
    pub discord_guild_id: Option<String>,
    pub database_path: String,
    pub log_level: String,
    pub command_prefix: String,
    pub command_cooldown_seconds: u64,
}

impl Config {
    /// Load configuration from the process environment
    ///
    /// Call `dotenvy::dotenv()` first if a `.env` file should be honoured.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let discord_token = lookup("DISCORD_TOKEN")
            .filter(|t| !t.trim().is_empty())
            .context("DISCORD_TOKEN environment variable is required")?;

        let discord_guild_id = lookup("DISCORD_GUILD_ID").filter(|id| !id.trim().is_empty());

        let database_path =
            lookup("DATABASE_PATH").unwrap_or_else(|| "tomodachi.db".to_string());

        let log_level = lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        let command_prefix = lookup("COMMAND_PREFIX")
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| "!".to_string());

        let command_cooldown_seconds = match lookup("COMMAND_COOLDOWN_SECONDS") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("COMMAND_COOLDOWN_SECONDS must be a number, got '{raw}'"))?,
            None => 5,
        };

        Ok(Config {
            discord_token,
            discord_guild_id,
            database_path,
            log_level,
            command_prefix,
            command_cooldown_seconds,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_applied() {
        let config = Config::from_lookup(lookup_from(&[("DISCORD_TOKEN", "abc")])).unwrap();

        assert_eq!(config.discord_token, "abc");
        assert_eq!(config.discord_guild_id, None);
        assert_eq!(config.database_path, "tomodachi.db");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.command_prefix, "!");
        assert_eq!(config.command_cooldown_seconds, 5);
    }

    #[test]
    fn test_missing_token_is_error() {
        assert!(Config::from_lookup(lookup_from(&[])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("DISCORD_TOKEN", "  ")])).is_err());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("DISCORD_TOKEN", "abc"),
            ("DISCORD_GUILD_ID", "1234"),
            ("DATABASE_PATH", "/tmp/r.db"),
            ("LOG_LEVEL", "debug"),
            ("COMMAND_PREFIX", "?"),
            ("COMMAND_COOLDOWN_SECONDS", "10"),
        ]))
        .unwrap();

        assert_eq!(config.discord_guild_id.as_deref(), Some("1234"));
        assert_eq!(config.database_path, "/tmp/r.db");
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.command_prefix, "?");
        assert_eq!(config.command_cooldown_seconds, 10);
    }

    #[test]
    fn test_bad_cooldown_is_error() {
        let result = Config::from_lookup(lookup_from(&[
            ("DISCORD_TOKEN", "abc"),
            ("COMMAND_COOLDOWN_SECONDS", "soon"),
        ]));
        assert!(result.is_err());
    }
}
