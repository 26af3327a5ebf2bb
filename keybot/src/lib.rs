//! # keybot
//!
//! Telegram group bot for keyboard enthusiasts: welcomes new members, counts wa-s, and posts the
//! best picture of the day from a subreddit. Loads config from env, wires storage, the Reddit
//! client and the image pipeline into a handler chain, and runs the REPL.

pub mod cli;
pub mod components;
pub mod config;
pub mod daily_best;
mod error;
pub mod handlers;
pub mod reddit_auth;
pub mod reports;
pub mod runner;

pub use cli::{load_config, Cli, Commands};
pub use components::{
    build_bot_components, build_daily_best, build_handler_chain, build_post_source, BotComponents,
};
pub use config::BotConfig;
pub use daily_best::{deliver_first, resolve_chat, select_candidates, DailyBest};
pub use handlers::{ChatRegistrationHandler, CommandHandler, WaHandler, WelcomeHandler};
pub use runner::{run_bot, send_reddit_best, send_wa_report, WaReport};
