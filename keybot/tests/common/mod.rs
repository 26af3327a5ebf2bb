//! Shared fakes for the keybot integration tests: a recording [`Bot`], a canned [`PostSource`]
//! and [`ImageTools`] that never shell out.

#![allow(dead_code)]

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use image_pipeline::{Dimensions, ImageError, ImageLimits, ImageTools, PhotoPreparer};
use keybot_core::{
    Bot, Chat, KeybotError, Message, PhotoInput, User, MESSAGE_TYPE_NEW_MEMBERS, MESSAGE_TYPE_TEXT,
};
use reddit_client::{Post, PostSource, RedditError};

pub const GROUP_ID: i64 = -1001;

/// One call made on [`RecordingBot`].
#[derive(Debug, Clone, PartialEq)]
pub enum Sent {
    Message {
        chat_id: i64,
        text: String,
    },
    Reply {
        chat_id: i64,
        reply_to: String,
        text: String,
    },
    Photo {
        chat_id: i64,
        photo: PhotoInput,
        caption: String,
        /// Whether a local photo file existed while it was being sent.
        file_existed: bool,
    },
}

/// Records every send; ids count up from 100. Photos whose URL contains a string in
/// `failing_photos` and, when `fail_messages` is set, every text message fail.
#[derive(Default)]
pub struct RecordingBot {
    pub sent: Mutex<Vec<Sent>>,
    pub failing_photos: Vec<String>,
    pub fail_messages: bool,
    next_id: AtomicUsize,
}

impl RecordingBot {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing_photos(patterns: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            failing_photos: patterns.iter().map(|p| p.to_string()).collect(),
            ..Self::default()
        })
    }

    pub fn failing_messages() -> Arc<Self> {
        Arc::new(Self {
            fail_messages: true,
            ..Self::default()
        })
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    fn next_id(&self) -> String {
        (100 + self.next_id.fetch_add(1, Ordering::SeqCst)).to_string()
    }

    /// Waits up to one second for at least `n` recorded sends.
    pub async fn wait_for(&self, n: usize) -> Vec<Sent> {
        for _ in 0..100 {
            if self.sent.lock().unwrap().len() >= n {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        self.sent()
    }
}

#[async_trait]
impl Bot for RecordingBot {
    async fn send_message(&self, chat: &Chat, text: &str) -> keybot_core::Result<String> {
        self.sent.lock().unwrap().push(Sent::Message {
            chat_id: chat.id,
            text: text.to_string(),
        });
        if self.fail_messages {
            return Err(KeybotError::Bot("send failed".to_string()));
        }
        Ok(self.next_id())
    }

    async fn reply_to(&self, chat: &Chat, message_id: &str, text: &str) -> keybot_core::Result<String> {
        self.sent.lock().unwrap().push(Sent::Reply {
            chat_id: chat.id,
            reply_to: message_id.to_string(),
            text: text.to_string(),
        });
        Ok(self.next_id())
    }

    async fn send_photo(
        &self,
        chat: &Chat,
        photo: &PhotoInput,
        caption: &str,
    ) -> keybot_core::Result<String> {
        let file_existed = match photo {
            PhotoInput::File(path) => path.exists(),
            PhotoInput::Url(_) => false,
        };
        if let PhotoInput::Url(url) = photo {
            if self.failing_photos.iter().any(|p| url.contains(p.as_str())) {
                return Err(KeybotError::Bot(format!("upload rejected: {}", url)));
            }
        }
        self.sent.lock().unwrap().push(Sent::Photo {
            chat_id: chat.id,
            photo: photo.clone(),
            caption: caption.to_string(),
            file_existed,
        });
        Ok(self.next_id())
    }
}

/// Returns the same posts for every call and counts the calls.
pub struct FakePostSource {
    pub posts: Vec<Post>,
    pub fail: bool,
    pub calls: AtomicUsize,
}

impl FakePostSource {
    pub fn new(posts: Vec<Post>) -> Arc<Self> {
        Arc::new(Self {
            posts,
            fail: false,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            posts: Vec::new(),
            fail: true,
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl PostSource for FakePostSource {
    async fn posts_since(
        &self,
        _subreddit: &str,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<Post>, RedditError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(RedditError::Status(503));
        }
        Ok(self
            .posts
            .iter()
            .filter(|p| p.created > cutoff)
            .cloned()
            .collect())
    }
}

/// `identify` fails for URIs containing `broken` and reports 5000x5000 for URIs containing
/// `huge`; everything else is 800x600. Download and resize write small files.
pub struct FakeTools;

#[async_trait]
impl ImageTools for FakeTools {
    async fn identify(&self, uri: &str) -> Result<Dimensions, ImageError> {
        if uri.contains("broken") {
            return Err(ImageError::ToolFailed {
                tool: "magick".to_string(),
                code: 1,
            });
        }
        if uri.contains("huge") {
            return Ok(Dimensions {
                width: 5000,
                height: 5000,
            });
        }
        Ok(Dimensions {
            width: 800,
            height: 600,
        })
    }

    async fn download(&self, _uri: &str, dest: &Path) -> Result<(), ImageError> {
        tokio::fs::write(dest, vec![0u8; 64]).await?;
        Ok(())
    }

    async fn resize(&self, _src: &Path, dst: &Path, _limits: &ImageLimits) -> Result<(), ImageError> {
        tokio::fs::write(dst, b"jpeg").await?;
        Ok(())
    }
}

pub fn preparer() -> PhotoPreparer {
    PhotoPreparer::new(
        reqwest::Client::new(),
        Arc::new(FakeTools),
        ImageLimits::default(),
    )
}

/// Mocks `HEAD <path>` with a small Content-Length.
pub async fn mock_head(server: &mut mockito::ServerGuard, path: &str) -> mockito::Mock {
    server
        .mock("HEAD", path)
        .with_status(200)
        .with_header("content-length", "1000")
        .create_async()
        .await
}

/// A link post `t3_<id>` created `minutes_ago` minutes ago.
pub fn post(id: &str, score: i64, link: &str, minutes_ago: i64) -> Post {
    Post {
        title: format!("post {}", id),
        text: String::new(),
        author: "someone".to_string(),
        score,
        permalink: format!("/r/MechanicalKeyboards/comments/{}/post/", id),
        link: link.to_string(),
        hide_score: false,
        name: format!("t3_{}", id),
        num_comments: 0,
        created: Utc::now() - chrono::Duration::minutes(minutes_ago),
        subreddit: "MechanicalKeyboards".to_string(),
    }
}

pub fn user(id: i64, username: Option<&str>, first_name: &str) -> User {
    User {
        id,
        username: username.map(str::to_string),
        first_name: Some(first_name.to_string()),
        last_name: None,
    }
}

pub fn group_chat(id: i64) -> Chat {
    Chat {
        id,
        chat_type: "supergroup".to_string(),
        title: Some("Keyboards".to_string()),
    }
}

pub fn text_message(id: i64, chat_id: i64, from: User, content: &str) -> Message {
    Message {
        id: id.to_string(),
        user: from,
        chat: group_chat(chat_id),
        content: content.to_string(),
        message_type: MESSAGE_TYPE_TEXT.to_string(),
        created_at: Utc::now(),
        reply_to_message_id: None,
        new_members: Vec::new(),
    }
}

pub fn reply_message(id: i64, chat_id: i64, from: User, content: &str, reply_to: i64) -> Message {
    Message {
        reply_to_message_id: Some(reply_to.to_string()),
        ..text_message(id, chat_id, from, content)
    }
}

pub fn new_members_message(chat_id: i64, members: Vec<User>) -> Message {
    Message {
        id: "1".to_string(),
        user: members
            .first()
            .cloned()
            .unwrap_or_else(|| user(1, None, "someone")),
        chat: group_chat(chat_id),
        content: String::new(),
        message_type: MESSAGE_TYPE_NEW_MEMBERS.to_string(),
        created_at: Utc::now(),
        reply_to_message_id: None,
        new_members: members,
    }
}
