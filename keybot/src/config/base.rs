//! Base config: Telegram Bot connection, logging, storage paths. Loaded from env.

use anyhow::Result;
use std::env;

use super::env::{bool_or, string_or};

/// Base config: Telegram-related, logging and storage only.
#[derive(Debug, Clone)]
pub struct BaseConfig {
    /// BOT_TOKEN
    pub bot_token: String,
    /// TELEGRAM_API_URL or TELOXIDE_API_URL
    pub telegram_api_url: Option<String>,
    /// Log file path
    pub log_file: String,
    /// KEYBOT_LOG_DEBUG: default filter `debug` instead of `info` (RUST_LOG still wins)
    pub log_debug: bool,
    /// Chat database (wa records): a file path or a `sqlite:` URL
    pub database_url: String,
    /// Runtime info JSON file shared by the bot and the one-shot commands
    pub runtime_info_path: String,
    /// Lock file guarding `runtime_info_path`
    pub runtime_lock_path: String,
}

impl BaseConfig {
    /// Load from environment variables. `token` overrides BOT_TOKEN if provided.
    pub fn load(token: Option<String>) -> Result<Self> {
        let bot_token = match token {
            Some(token) => token,
            None => env::var("BOT_TOKEN").map_err(|_| anyhow::anyhow!("BOT_TOKEN not set"))?,
        };
        let telegram_api_url = env::var("TELEGRAM_API_URL")
            .or_else(|_| env::var("TELOXIDE_API_URL"))
            .ok()
            .filter(|s| !s.trim().is_empty());

        Ok(Self {
            bot_token,
            telegram_api_url,
            log_file: string_or("LOG_FILE", "logs/keybot.log"),
            log_debug: bool_or("KEYBOT_LOG_DEBUG", false)?,
            database_url: string_or("DATABASE_URL", "chat.db"),
            runtime_info_path: string_or("RUNTIME_INFO_PATH", "runtime-info.json"),
            runtime_lock_path: string_or("RUNTIME_LOCK_PATH", "runtime-info.lock"),
        })
    }

    /// Default tracing filter when RUST_LOG is unset.
    pub fn default_log_level(&self) -> &'static str {
        if self.log_debug {
            "debug"
        } else {
            "info"
        }
    }

    /// Validate config (e.g. telegram_api_url must be valid URL if set).
    pub fn validate(&self) -> Result<()> {
        if let Some(ref url_str) = self.telegram_api_url {
            if reqwest::Url::parse(url_str).is_err() {
                anyhow::bail!(
                    "TELEGRAM_API_URL (or TELOXIDE_API_URL) is set but not a valid URL: {}",
                    url_str
                );
            }
        }
        Ok(())
    }
}
