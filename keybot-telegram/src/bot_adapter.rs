//! Wraps teloxide::Bot and implements [`keybot_core::Bot`]. Production code sends via Telegram;
//! tests substitute another Bot impl.

use async_trait::async_trait;
use keybot_core::{parse_message_id, Bot as CoreBot, Chat, KeybotError, PhotoInput, Result};
use teloxide::prelude::*;
use teloxide::types::{ChatId, InputFile, MessageId, ParseMode, ReplyParameters};
use tracing::debug;

/// Thin wrapper around teloxide::Bot that implements keybot-core's Bot trait.
/// All text and captions go out with HTML parse mode.
#[derive(Clone)]
pub struct TelegramBotAdapter {
    bot: teloxide::Bot,
}

impl TelegramBotAdapter {
    /// Creates an adapter from an existing teloxide Bot.
    pub fn new(bot: teloxide::Bot) -> Self {
        Self { bot }
    }
}

fn bot_error(e: teloxide::RequestError) -> KeybotError {
    KeybotError::Bot(e.to_string())
}

#[async_trait]
impl CoreBot for TelegramBotAdapter {
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<String> {
        let sent = self
            .bot
            .send_message(ChatId(chat.id), text.to_string())
            .parse_mode(ParseMode::Html)
            .await
            .map_err(bot_error)?;
        Ok(sent.id.0.to_string())
    }

    async fn reply_to(&self, chat: &Chat, message_id: &str, text: &str) -> Result<String> {
        let id = parse_message_id(message_id)?;
        let sent = self
            .bot
            .send_message(ChatId(chat.id), text.to_string())
            .parse_mode(ParseMode::Html)
            .reply_parameters(ReplyParameters::new(MessageId(id)))
            .await
            .map_err(bot_error)?;
        Ok(sent.id.0.to_string())
    }

    async fn send_photo(&self, chat: &Chat, photo: &PhotoInput, caption: &str) -> Result<String> {
        let file = match photo {
            PhotoInput::Url(url) => {
                let url = reqwest::Url::parse(url)
                    .map_err(|e| KeybotError::Bot(format!("Invalid photo URL {}: {}", url, e)))?;
                InputFile::url(url)
            }
            PhotoInput::File(path) => InputFile::file(path.clone()),
        };
        debug!(chat_id = chat.id, photo = ?photo, "Sending photo");
        let sent = self
            .bot
            .send_photo(ChatId(chat.id), file)
            .caption(caption.to_string())
            .parse_mode(ParseMode::Html)
            .await
            .map_err(bot_error)?;
        Ok(sent.id.0.to_string())
    }
}
