//! # keybot-core
//!
//! Core types and traits for the bot: [`Bot`], [`Handler`], message and user types, the `${key}`
//! template and tracing initialization. Transport-agnostic; used by keybot-telegram, handler-chain
//! and the keybot application.

pub mod bot;
pub mod error;
pub mod logger;
pub mod template;
pub mod types;

pub use bot::{parse_message_id, Bot};
pub use error::{HandlerError, KeybotError, Result};
pub use logger::init_tracing;
pub use template::{html_escape, user_mention, SimpleTemplate};
pub use types::{
    Chat, Handler, HandlerResponse, Message, PhotoInput, ToCoreMessage, ToCoreUser, User,
    MESSAGE_TYPE_NEW_MEMBERS, MESSAGE_TYPE_OTHER, MESSAGE_TYPE_TEXT,
};
