//! CLI parser and config loading.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::BotConfig;

#[derive(Parser, Debug)]
#[command(name = "keybot")]
#[command(about = "Telegram bot for r/MechanicalKeyboards groups", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Env file loaded before reading the config.
    #[arg(long, global = true, default_value = ".env")]
    pub env_file: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the Telegram bot (config from env; token can override BOT_TOKEN).
    Run {
        #[arg(short, long)]
        token: Option<String>,
    },
    /// Post today's best Reddit picture and exit.
    SendRedditBest {
        /// Target chat; defaults to KEYBOT_GROUP_ID, then the first chat the bot joined.
        #[arg(long, allow_negative_numbers = true)]
        chat: Option<i64>,
    },
    /// Announce the user with the most wa-s in the last H hours.
    SendBestWaer {
        #[arg(long, default_value = "24")]
        hours: i64,
        /// Message template; `${name}` and `${count}` are filled in.
        #[arg(long)]
        template: String,
        #[arg(long, allow_negative_numbers = true)]
        chat: Option<i64>,
    },
    /// Reply to the message with the most wa-s in the last H hours.
    SendBestWaable {
        #[arg(long, default_value = "24")]
        hours: i64,
        /// Message template; `${count}` is filled in.
        #[arg(long)]
        template: String,
        #[arg(long, allow_negative_numbers = true)]
        chat: Option<i64>,
    },
    /// Authorize the Reddit app with the OAuth code flow.
    RedditAuth {
        #[arg(long, default_value = "31416")]
        port: u16,
    },
}

/// Load BotConfig from environment. If `token` is provided it overrides BOT_TOKEN.
pub fn load_config(token: Option<String>) -> Result<BotConfig> {
    BotConfig::load(token)
}
