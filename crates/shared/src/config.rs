use anyhow::{Context, Result};
use std::env;

use crate::models::TriggerTime;

const CONFIG_HELP: &str = "To fix this, create ~/.config/daily-briefing/.env with:\n  \
    GUARDIAN_API_KEY=your_key_here\n  \
    COHERE_API_KEY=your_key_here\n  \
    TELEGRAM_TOKEN=your_bot_token_here\n  \
    TELEGRAM_CHAT_ID=your_chat_id_here";

#[derive(Clone)]
pub struct Config {
    pub guardian_api_key: String,
    pub cohere_api_key: String,
    pub telegram_token: String,
    pub telegram_chat_id: String,
    pub briefing_time: TriggerTime,
    pub guardian_section: String,
    pub cohere_model: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Try to load .env from multiple locations
        Self::try_load_dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &str, hint: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .with_context(|| format!("{} not found.\n\n{}\n\n{}", key, CONFIG_HELP, hint))
        };

        let guardian_api_key = required(
            "GUARDIAN_API_KEY",
            "Get a Guardian API key from: https://open-platform.theguardian.com/access/",
        )?;
        let cohere_api_key = required(
            "COHERE_API_KEY",
            "Get a Cohere API key from: https://dashboard.cohere.com/api-keys",
        )?;
        let telegram_token = required(
            "TELEGRAM_TOKEN",
            "Create a bot and get its token from @BotFather in Telegram",
        )?;
        let telegram_chat_id = required(
            "TELEGRAM_CHAT_ID",
            "Send your bot a message, then read the chat id from getUpdates",
        )?;

        let briefing_time = match lookup("BRIEFING_TIME") {
            Some(value) => value
                .parse::<TriggerTime>()
                .context("BRIEFING_TIME is set but could not be parsed")?,
            None => TriggerTime::default(),
        };

        let guardian_section = lookup("GUARDIAN_SECTION").unwrap_or_else(|| "world".to_string());
        let cohere_model = lookup("COHERE_MODEL").unwrap_or_else(|| "command".to_string());

        Ok(Self {
            guardian_api_key,
            cohere_api_key,
            telegram_token,
            telegram_chat_id,
            briefing_time,
            guardian_section,
            cohere_model,
        })
    }

    fn try_load_dotenv() {
        // 1. Current directory (for development)
        if dotenvy::dotenv().is_ok() {
            return;
        }

        // 2. ~/.config/daily-briefing/.env (standard config location)
        if let Some(config_dir) = dirs::config_dir() {
            let config_path = config_dir.join("daily-briefing").join(".env");
            if config_path.exists() && dotenvy::from_path(&config_path).is_ok() {
                return;
            }
        }

        // 3. ~/.env (home directory)
        if let Some(home_dir) = dirs::home_dir() {
            let home_path = home_dir.join(".env");
            if home_path.exists() {
                let _ = dotenvy::from_path(&home_path);
            }
        }
    }
}
