//! Remembers chats the bot itself is added to.

use async_trait::async_trait;
use keybot_core::{Handler, HandlerResponse, Message, Result};
use std::sync::Arc;
use storage::RuntimeInfoStore;
use tracing::{debug, error, info, instrument};

use super::BotUsername;

/// On a new-members message that includes the bot, registers the chat in runtime info and stops.
pub struct ChatRegistrationHandler {
    runtime_info: Arc<RuntimeInfoStore>,
    bot_username: BotUsername,
}

impl ChatRegistrationHandler {
    pub fn new(runtime_info: Arc<RuntimeInfoStore>, bot_username: BotUsername) -> Self {
        Self {
            runtime_info,
            bot_username,
        }
    }
}

#[async_trait]
impl Handler for ChatRegistrationHandler {
    #[instrument(skip(self, message), fields(chat_id = message.chat.id))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        if !message.is_new_members() {
            return Ok(HandlerResponse::Continue);
        }
        debug!(title = ?message.chat.title, "New members in chat");

        let username = self.bot_username.read().await.clone().unwrap_or_default();
        if !message.new_members.iter().any(|u| u.has_username(&username)) {
            return Ok(HandlerResponse::Continue);
        }

        match self.runtime_info.register_chat(message.chat.id).await {
            Ok(true) => info!("Bot added to chat, chat registered"),
            Ok(false) => debug!("Chat already registered"),
            Err(e) => error!(error = %e, "Failed to save runtime info"),
        }
        Ok(HandlerResponse::Stop)
    }
}
