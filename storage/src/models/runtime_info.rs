//! Runtime info model: the small JSON document shared by the polling bot and one-shot commands.

use serde::{Deserialize, Serialize};

/// Contents of `runtime-info.json`.
///
/// Field names are the on-disk keys; missing keys deserialize to their defaults so older files
/// keep loading.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeInfo {
    /// Chats the bot has been added to, in order of registration.
    #[serde(default)]
    pub chat_id: Vec<i64>,
    /// Message id of the last daily-best post.
    #[serde(default)]
    pub last_msg_id: Option<i64>,
    /// Wa-s counted for the last daily-best post.
    #[serde(default)]
    pub wa_count: u32,
}

impl RuntimeInfo {
    /// Adds `chat_id` unless already present. Returns whether it was added.
    pub fn register_chat(&mut self, chat_id: i64) -> bool {
        if self.chat_id.contains(&chat_id) {
            return false;
        }
        self.chat_id.push(chat_id);
        true
    }

    /// Remembers the daily-best post and resets its wa counter.
    pub fn record_daily_post(&mut self, message_id: i64) {
        self.last_msg_id = Some(message_id);
        self.wa_count = 0;
    }

    /// The first registered chat, used when no group is configured.
    pub fn primary_chat(&self) -> Option<i64> {
        self.chat_id.first().copied()
    }
}
