//! Core types: user, chat, message, photo input, handler response, and Handler trait.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// `message_type` of a plain text message.
pub const MESSAGE_TYPE_TEXT: &str = "text";
/// `message_type` of a service message announcing new chat members.
pub const MESSAGE_TYPE_NEW_MEMBERS: &str = "new_chat_members";
/// `message_type` of anything else (photos, stickers, other service messages).
pub const MESSAGE_TYPE_OTHER: &str = "other";

/// User identity (id, username, names).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl User {
    /// First and last name joined by a space; the last name is optional.
    pub fn full_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (Some(first), None) => first.clone(),
            (None, Some(last)) => last.clone(),
            (None, None) => String::new(),
        }
    }

    /// `@username` when the user has one, otherwise the full name.
    pub fn display_name(&self) -> String {
        match &self.username {
            Some(nick) => format!("@{}", nick),
            None => self.full_name(),
        }
    }

    /// Whether this user has the given username (compared without a leading `@`, case-insensitive).
    pub fn has_username(&self, username: &str) -> bool {
        let wanted = username.trim_start_matches('@');
        self.username
            .as_deref()
            .is_some_and(|nick| !wanted.is_empty() && nick.eq_ignore_ascii_case(wanted))
    }
}

/// Chat (group, supergroup, channel or private) identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
    pub chat_type: String,
    pub title: Option<String>,
}

impl Chat {
    /// A chat known only by id (e.g. the configured group when sending from the CLI).
    pub fn with_id(id: i64) -> Self {
        Self {
            id,
            chat_type: "unknown".to_string(),
            title: None,
        }
    }
}

/// A single incoming message with sender, chat, content and reply / service context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub user: User,
    pub chat: Chat,
    pub content: String,
    /// One of [`MESSAGE_TYPE_TEXT`], [`MESSAGE_TYPE_NEW_MEMBERS`], [`MESSAGE_TYPE_OTHER`].
    pub message_type: String,
    pub created_at: DateTime<Utc>,
    /// Id of the replied-to message; unset when the parent is a channel post.
    pub reply_to_message_id: Option<String>,
    /// Users that joined the chat; only filled for [`MESSAGE_TYPE_NEW_MEMBERS`].
    pub new_members: Vec<User>,
}

impl Message {
    pub fn is_text(&self) -> bool {
        self.message_type == MESSAGE_TYPE_TEXT
    }

    pub fn is_new_members(&self) -> bool {
        self.message_type == MESSAGE_TYPE_NEW_MEMBERS && !self.new_members.is_empty()
    }
}

/// Photo to send: a remote URL Telegram fetches itself, or a local file to upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotoInput {
    Url(String),
    File(PathBuf),
}

/// Handler result for the chain. `Reply(text)` carries the response body so later handlers can use it in `after()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerResponse {
    /// Pass to next handler.
    Continue,
    /// Stop the chain; no response body.
    Stop,
    /// Skip this handler, try next.
    Ignore,
    /// Stop the chain and attach reply text.
    Reply(String),
}

/// Converts a transport-specific user type to core [`User`].
pub trait ToCoreUser: Send + Sync {
    fn to_core(&self) -> User;
}

/// Converts a transport-specific message type to core [`Message`].
pub trait ToCoreMessage: Send + Sync {
    fn to_core(&self) -> Message;
}

/// Single handler concept: optional before / handle / after. Chain runs all before → handle until Stop/Reply → all after (reverse).
#[async_trait]
pub trait Handler: Send + Sync {
    /// Runs before the handle phase. Return false to stop the chain.
    async fn before(&self, _message: &Message) -> crate::error::Result<bool> {
        Ok(true)
    }
    /// Processes the message. Return Stop or Reply to end the handle phase. Default: Continue.
    async fn handle(&self, _message: &Message) -> crate::error::Result<HandlerResponse> {
        Ok(HandlerResponse::Continue)
    }
    /// Runs after the handle phase (reverse order), with the final response.
    async fn after(
        &self,
        _message: &Message,
        _response: &HandlerResponse,
    ) -> crate::error::Result<()> {
        Ok(())
    }
}
