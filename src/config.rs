//! Configuration types.
//!
//! Everything is read from the environment once at startup. A missing bot
//! token stops the process before any chat is handled; a malformed manager
//! chat id only disables the group copy of reports.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use crate::error::ConfigError;

/// Environment variable holding the Telegram bot token.
pub const TOKEN_VAR: &str = "TOKEN";
/// Environment variable holding the managers' chat id.
pub const MANAGER_CHAT_ID_VAR: &str = "MANAGER_CHAT_ID";
/// Environment variable overriding the long-poll timeout, in seconds.
pub const POLL_TIMEOUT_VAR: &str = "REPORT_BOT_POLL_TIMEOUT_SECS";

/// Default long-poll timeout for `getUpdates`.
const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(5);

/// Bot configuration.
#[derive(Debug)]
pub struct BotConfig {
    /// Telegram Bot API token.
    pub token: SecretString,
    /// Chat that receives a copy of every finished report.
    pub manager_chat_id: Option<i64>,
    /// How long a single `getUpdates` call may wait for new messages.
    pub poll_timeout: Duration,
}

impl BotConfig {
    /// Build the configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = lookup(TOKEN_VAR)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(TOKEN_VAR.to_string()))?;

        let manager_chat_id = lookup(MANAGER_CHAT_ID_VAR).and_then(|raw| {
            match parse_chat_id(&raw) {
                Ok(id) => Some(id),
                Err(e) => {
                    tracing::warn!("{e}; reports will not be copied to a manager chat");
                    None
                }
            }
        });

        let poll_timeout = lookup(POLL_TIMEOUT_VAR)
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_POLL_TIMEOUT);

        Ok(Self {
            token: SecretString::from(token),
            manager_chat_id,
            poll_timeout,
        })
    }

    /// The bot token as a plain string, for building API URLs.
    pub fn token(&self) -> &str {
        self.token.expose_secret()
    }
}

fn parse_chat_id(raw: &str) -> Result<i64, ConfigError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|e| ConfigError::InvalidValue {
            key: MANAGER_CHAT_ID_VAR.to_string(),
            message: format!("{raw:?} is not an integer chat id ({e})"),
        })
}
