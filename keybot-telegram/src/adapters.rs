//! Adapters from Telegram (teloxide) types to keybot_core types.

use keybot_core::{
    Chat, Message, ToCoreMessage, ToCoreUser, User, MESSAGE_TYPE_NEW_MEMBERS, MESSAGE_TYPE_OTHER,
    MESSAGE_TYPE_TEXT,
};

/// Wraps a teloxide User for conversion to core [`User`].
pub struct TelegramUserWrapper<'a>(pub &'a teloxide::types::User);

impl<'a> ToCoreUser for TelegramUserWrapper<'a> {
    fn to_core(&self) -> User {
        User {
            id: self.0.id.0 as i64,
            username: self.0.username.clone(),
            first_name: Some(self.0.first_name.clone()),
            last_name: self.0.last_name.clone(),
        }
    }
}

/// Wraps a teloxide Message for conversion to core [`Message`].
pub struct TelegramMessageWrapper<'a>(pub &'a teloxide::types::Message);

impl<'a> ToCoreMessage for TelegramMessageWrapper<'a> {
    fn to_core(&self) -> Message {
        let msg = self.0;
        let new_members: Vec<User> = msg
            .new_chat_members()
            .map(|members| members.iter().map(|u| TelegramUserWrapper(u).to_core()).collect())
            .unwrap_or_default();

        Message {
            id: msg.id.0.to_string(),
            user: msg
                .from
                .as_ref()
                .map(|u| TelegramUserWrapper(u).to_core())
                .unwrap_or_else(|| User {
                    id: 0,
                    username: None,
                    first_name: None,
                    last_name: None,
                }),
            chat: Chat {
                id: msg.chat.id.0,
                chat_type: chat_type(&msg.chat).to_string(),
                title: msg.chat.title().map(str::to_string),
            },
            content: msg.text().unwrap_or("").to_string(),
            message_type: self.message_type().to_string(),
            created_at: msg.date,
            reply_to_message_id: self.get_reply_to_message_id(),
            new_members,
        }
    }
}

impl<'a> TelegramMessageWrapper<'a> {
    fn message_type(&self) -> &'static str {
        if self.0.new_chat_members().is_some_and(|m| !m.is_empty()) {
            MESSAGE_TYPE_NEW_MEMBERS
        } else if self.0.text().is_some() {
            MESSAGE_TYPE_TEXT
        } else {
            MESSAGE_TYPE_OTHER
        }
    }

    /// Id of the replied-to message; channel posts are not counted as parents.
    fn get_reply_to_message_id(&self) -> Option<String> {
        self.0
            .reply_to_message()
            .filter(|parent| !parent.chat.is_channel())
            .map(|parent| parent.id.0.to_string())
    }
}

fn chat_type(chat: &teloxide::types::Chat) -> &'static str {
    if chat.is_private() {
        "private"
    } else if chat.is_supergroup() {
        "supergroup"
    } else if chat.is_group() {
        "group"
    } else if chat.is_channel() {
        "channel"
    } else {
        "unknown"
    }
}
