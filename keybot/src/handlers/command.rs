//! Admin commands: `/redditbest` and `/redditpreview`.

use async_trait::async_trait;
use keybot_core::{Handler, HandlerResponse, Message, Result};
use tracing::{info, instrument};

use super::BotUsername;
use crate::daily_best::DailyBest;

const CMD_BEST: &str = "redditbest";
const CMD_PREVIEW: &str = "redditpreview";

/// Runs the daily best on demand. Restricted to `admins` (usernames or numeric ids) when the list
/// is not empty; other users are ignored.
pub struct CommandHandler {
    daily_best: DailyBest,
    admins: Vec<String>,
    bot_username: BotUsername,
}

impl CommandHandler {
    pub fn new(daily_best: DailyBest, admins: Vec<String>, bot_username: BotUsername) -> Self {
        Self {
            daily_best,
            admins,
            bot_username,
        }
    }

    /// Command name of `text` (`/cmd` or `/cmd@thisbot`), or `None`.
    async fn command<'a>(&self, text: &'a str) -> Option<&'a str> {
        let first = text.split_whitespace().next()?;
        let cmd = first.strip_prefix('/')?;
        match cmd.split_once('@') {
            Some((name, target)) => {
                let own = self.bot_username.read().await.clone().unwrap_or_default();
                target.eq_ignore_ascii_case(&own).then_some(name)
            }
            None => Some(cmd),
        }
    }

    fn is_admin(&self, message: &Message) -> bool {
        if self.admins.is_empty() {
            return true;
        }
        let id = message.user.id.to_string();
        self.admins
            .iter()
            .any(|admin| *admin == id || message.user.has_username(admin))
    }
}

#[async_trait]
impl Handler for CommandHandler {
    #[instrument(skip(self, message), fields(chat_id = message.chat.id, user_id = message.user.id))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        if !message.is_text() {
            return Ok(HandlerResponse::Continue);
        }
        let command = match self.command(&message.content).await {
            Some(cmd @ (CMD_BEST | CMD_PREVIEW)) => cmd,
            _ => return Ok(HandlerResponse::Continue),
        };
        if !self.is_admin(message) {
            info!(command, "Ignoring command from non-admin");
            return Ok(HandlerResponse::Stop);
        }

        info!(command, "Running command");
        let message_id = if command == CMD_BEST {
            self.daily_best.send_best_today(None).await?
        } else {
            self.daily_best.preview(&message.chat).await?
        };
        info!(command, message_id = %message_id, "Command done");
        Ok(HandlerResponse::Stop)
    }
}
