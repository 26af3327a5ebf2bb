//! Bot abstraction for sending messages and photos.
//!
//! [`Bot`] is transport-agnostic; keybot-telegram implements it via teloxide. Handlers and the
//! daily-best pipeline only see this trait, so tests substitute a recording implementation.

use crate::error::{KeybotError, Result};
use crate::types::{Chat, PhotoInput};
use async_trait::async_trait;

/// Sending side of the bot. Every method returns the transport-specific id of the sent message
/// (Telegram numeric id as string). Text is sent with HTML parse mode.
#[async_trait]
pub trait Bot: Send + Sync {
    /// Sends a text message to the given chat.
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<String>;
    /// Sends a text message as a reply to `message_id` in the same chat.
    async fn reply_to(&self, chat: &Chat, message_id: &str, text: &str) -> Result<String>;
    /// Sends a photo (by URL or local upload) with an HTML caption.
    async fn send_photo(&self, chat: &Chat, photo: &PhotoInput, caption: &str) -> Result<String>;
}

/// Parses a message id string into an i32. Used by reply_to.
pub fn parse_message_id(s: &str) -> Result<i32> {
    s.parse()
        .map_err(|_| KeybotError::Bot(format!("Invalid message_id: {}", s)))
}
