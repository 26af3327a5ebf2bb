//! Wa counting: a text reply that starts with the trigger is a wa for the replied message.

use async_trait::async_trait;
use keybot_core::{Bot, Handler, HandlerError, HandlerResponse, Message, Result};
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use storage::{StorageError, WaEntry, WaRepository};
use tracing::{debug, error, info, instrument};

use crate::config::WaConfig;
use crate::error::storage_error;

/// Records wa-s in the configured group. When a message reaches exactly `threshold` wa-s the bot
/// joins in with its own reply after a random delay.
pub struct WaHandler {
    bot: Arc<dyn Bot>,
    repo: Arc<WaRepository>,
    group_id: Option<i64>,
    config: WaConfig,
}

impl WaHandler {
    pub fn new(
        bot: Arc<dyn Bot>,
        repo: Arc<WaRepository>,
        group_id: Option<i64>,
        config: WaConfig,
    ) -> Self {
        Self {
            bot,
            repo,
            group_id,
            config,
        }
    }

    fn is_wa(&self, message: &Message) -> bool {
        message.is_text()
            && message.reply_to_message_id.is_some()
            && message.content.starts_with(&self.config.trigger)
    }

    /// Uniform in `[min, max)`; `min` when the range is empty.
    fn reply_delay(&self) -> Duration {
        let min = self.config.delay_min_secs.saturating_mul(1000);
        let max = self.config.delay_max_secs.saturating_mul(1000);
        let millis = if min < max {
            rand::thread_rng().gen_range(min..max)
        } else {
            min
        };
        Duration::from_millis(millis)
    }

    fn spawn_delayed_reply(&self, message: &Message, wa_to: String) {
        let bot = self.bot.clone();
        let chat = message.chat.clone();
        let text = self.config.reply.clone();
        let delay = self.reply_delay();
        info!(wa_to = %wa_to, delay_ms = delay.as_millis() as u64, "Scheduling wa reply");

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(e) = bot.reply_to(&chat, &wa_to, &text).await {
                error!(chat_id = chat.id, wa_to = %wa_to, error = %e, "Failed to send wa reply");
            }
        });
    }
}

fn parse_id(field: &str, value: &str) -> Result<i64> {
    value
        .parse()
        .map_err(|_| HandlerError::State(format!("Invalid {}: {}", field, value)).into())
}

#[async_trait]
impl Handler for WaHandler {
    #[instrument(skip(self, message), fields(chat_id = message.chat.id, message_id = %message.id))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        if !self.is_wa(message) {
            return Ok(HandlerResponse::Continue);
        }
        // Wa-s only count in the configured group.
        if self.group_id != Some(message.chat.id) {
            return Ok(HandlerResponse::Continue);
        }
        let Some(wa_to) = message.reply_to_message_id.clone() else {
            return Ok(HandlerResponse::Continue);
        };

        let entry = WaEntry {
            id: parse_id("message id", &message.id)?,
            wa_to: parse_id("reply_to message id", &wa_to)?,
            waer: message.user.id,
            waer_name: message.user.display_name(),
            time: message.created_at,
        };

        let count = match self.repo.add_wa(entry).await {
            Ok(count) => count,
            Err(StorageError::AlreadyExists(what)) => {
                debug!(what = %what, "Wa already recorded");
                return Ok(HandlerResponse::Stop);
            }
            Err(e) => return Err(storage_error(e)),
        };
        debug!(wa_to = %wa_to, count, "It's a wa");

        if count == self.config.threshold {
            self.spawn_delayed_reply(message, wa_to);
        }
        Ok(HandlerResponse::Stop)
    }
}
