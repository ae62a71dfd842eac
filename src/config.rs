use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::env;

use crate::game::help::DEFAULT_FRIEND_CALL_ACCURACY;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub game: GameConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GameConfig {
    pub question_pool_path: String,
    /// Whether cashing out before the first correct answer is allowed
    pub allow_empty_cash_out: bool,
    /// Chance in percent that a friend call suggests the right answer
    pub friend_call_accuracy: u8,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            question_pool_path: "./questions.json".to_string(),
            allow_empty_cash_out: true,
            friend_call_accuracy: DEFAULT_FRIEND_CALL_ACCURACY,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub filter: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from any key lookup; `from_env` passes the process environment
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = GameConfig::default();

        let friend_call_accuracy = match lookup("FRIEND_CALL_ACCURACY") {
            Some(value) => value
                .trim()
                .parse()
                .context("FRIEND_CALL_ACCURACY must be a number")?,
            None => defaults.friend_call_accuracy,
        };
        if friend_call_accuracy > 100 {
            bail!("FRIEND_CALL_ACCURACY must be a percentage (0-100)");
        }

        let game = GameConfig {
            question_pool_path: lookup("QUESTION_POOL_PATH")
                .unwrap_or(defaults.question_pool_path),
            allow_empty_cash_out: match lookup("ALLOW_EMPTY_CASH_OUT") {
                Some(value) => parse_bool(&value)
                    .context("ALLOW_EMPTY_CASH_OUT must be true or false")?,
                None => defaults.allow_empty_cash_out,
            },
            friend_call_accuracy,
        };

        let logging = LoggingConfig {
            filter: lookup("LOG_FILTER")
                .unwrap_or_else(|| "millionaire_backend=debug".to_string()),
        };

        Ok(Config { game, logging })
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => bail!("'{}' is not a boolean", other),
    }
}
