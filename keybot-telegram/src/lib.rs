//! # keybot-telegram
//!
//! Telegram transport layer: adapters from teloxide types, the [`keybot_core::Bot`]
//! implementation, connection config and the REPL runner. Knows nothing about welcome, wa or
//! Reddit logic; that lives in handlers run by the chain.

mod adapters;
mod bot_adapter;
mod config;
mod runner;

pub use adapters::{TelegramMessageWrapper, TelegramUserWrapper};
pub use bot_adapter::TelegramBotAdapter;
pub use config::TelegramConfig;
pub use runner::run_repl;
