//! Greets new chat members.

use async_trait::async_trait;
use keybot_core::{
    user_mention, Bot, Handler, HandlerError, HandlerResponse, KeybotError, Message, Result,
    SimpleTemplate,
};
use std::sync::Arc;
use tracing::{error, info, instrument};

/// Sends the welcome template once per new member; `${user}` becomes a mention of the member.
pub struct WelcomeHandler {
    bot: Arc<dyn Bot>,
    template: String,
    enabled: bool,
}

impl WelcomeHandler {
    pub fn new(bot: Arc<dyn Bot>, template: impl Into<String>, enabled: bool) -> Self {
        Self {
            bot,
            template: template.into(),
            enabled,
        }
    }
}

#[async_trait]
impl Handler for WelcomeHandler {
    #[instrument(skip(self, message), fields(chat_id = message.chat.id))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        if !self.enabled || !message.is_new_members() {
            return Ok(HandlerResponse::Continue);
        }
        if self.template.trim().is_empty() {
            return Err(HandlerError::EmptyTemplate.into());
        }

        let mut failed = false;
        for user in &message.new_members {
            info!(
                user_id = user.id,
                name = %user.display_name(),
                title = ?message.chat.title,
                "User joined chat"
            );
            let text = SimpleTemplate::new(&self.template)
                .apply("user", user_mention(user.id, &user.full_name()))
                .result();
            if let Err(e) = self.bot.send_message(&message.chat, &text).await {
                error!(user_id = user.id, error = %e, "Failed to send welcome");
                failed = true;
            }
        }

        if failed {
            return Err(KeybotError::Bot("Failed to welcome".to_string()));
        }
        Ok(HandlerResponse::Stop)
    }
}
