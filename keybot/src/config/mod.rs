//! Bot configuration: BaseConfig (Telegram + log + storage) + KeybotExtensions (general, Reddit,
//! image, wa). Everything is read from environment variables; load `.env` first.

mod base;
mod bot_config;
mod env;
mod extensions;


pub use base::BaseConfig;
pub use bot_config::BotConfig;
pub use extensions::{GeneralConfig, ImageConfig, KeybotExtensions, RedditConfig, WaConfig};
