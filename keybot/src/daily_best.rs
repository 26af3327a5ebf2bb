//! Daily best picture: fetch the last 24 hours of a subreddit, rank the image posts by score and
//! post the first one that can be delivered.

use std::sync::Arc;

use chrono::{Duration, Utc};
use image_pipeline::{PhotoPreparer, PreparedPhoto};
use keybot_core::{Bot, Chat, KeybotError, PhotoInput, Result, SimpleTemplate};
use reddit_client::{Post, PostSource};
use storage::RuntimeInfoStore;
use tracing::{debug, error, info, instrument};

use crate::error::{image_error, reddit_error, storage_error};

/// Image link posts, highest score first. On equal scores the later listing entry (the older
/// post in `/new`) comes first.
pub fn select_candidates(posts: Vec<Post>) -> Vec<Post> {
    let mut candidates: Vec<Post> = posts
        .into_iter()
        .filter(|p| p.is_link() && p.is_image_link())
        .collect();
    candidates.sort_by_key(|p| p.score);
    candidates.reverse();
    candidates
}

/// Tries each candidate in order and returns the message id of the first photo sent.
///
/// A candidate fails when preparing the image or sending it fails; the error is logged and the
/// next one is tried. [`KeybotError::NoCandidate`] when none succeeds.
pub async fn deliver_first(
    bot: &dyn Bot,
    preparer: &PhotoPreparer,
    chat: &Chat,
    candidates: &[Post],
    caption_template: &str,
) -> Result<String> {
    for post in candidates {
        let short_url = post.short_url();
        info!(
            chat_id = chat.id,
            post = %short_url,
            link = %post.link,
            score = post.score,
            "Trying best post"
        );

        match deliver_one(bot, preparer, chat, post, caption_template).await {
            Ok(message_id) => return Ok(message_id),
            Err(e) => error!(
                chat_id = chat.id,
                post = %short_url,
                error = %e,
                "Failed to send post as the best daily post"
            ),
        }
    }

    Err(KeybotError::NoCandidate(format!(
        "none of {} candidates could be sent",
        candidates.len()
    )))
}

async fn deliver_one(
    bot: &dyn Bot,
    preparer: &PhotoPreparer,
    chat: &Chat,
    post: &Post,
    caption_template: &str,
) -> Result<String> {
    let prepared = preparer.prepare(&post.link).await.map_err(image_error)?;
    let photo = match &prepared {
        PreparedPhoto::Remote(uri) => PhotoInput::Url(uri.clone()),
        PreparedPhoto::Resized(path) => PhotoInput::File(path.to_path_buf()),
    };
    let caption = SimpleTemplate::new(caption_template)
        .apply("url", post.short_url())
        .result();

    let message_id = bot.send_photo(chat, &photo, &caption).await?;
    // The resized file must outlive the upload.
    drop(prepared);
    Ok(message_id)
}

/// Target chat: `explicit`, else `group_id`, else the first chat the bot was added to.
pub async fn resolve_chat(
    explicit: Option<i64>,
    group_id: Option<i64>,
    runtime_info: &RuntimeInfoStore,
) -> Result<Chat> {
    if let Some(id) = explicit.or(group_id) {
        return Ok(Chat::with_id(id));
    }
    match runtime_info.primary_chat().await.map_err(storage_error)? {
        Some(id) => Ok(Chat::with_id(id)),
        None => Err(KeybotError::Config("No group ID specified".to_string())),
    }
}

/// Everything needed to post the daily best picture.
#[derive(Clone)]
pub struct DailyBest {
    bot: Arc<dyn Bot>,
    source: Arc<dyn PostSource>,
    preparer: PhotoPreparer,
    runtime_info: Arc<RuntimeInfoStore>,
    subreddit: String,
    caption_template: String,
    group_id: Option<i64>,
}

impl DailyBest {
    pub fn new(
        bot: Arc<dyn Bot>,
        source: Arc<dyn PostSource>,
        preparer: PhotoPreparer,
        runtime_info: Arc<RuntimeInfoStore>,
    ) -> Self {
        Self {
            bot,
            source,
            preparer,
            runtime_info,
            subreddit: "MechanicalKeyboards".to_string(),
            caption_template: "${url}".to_string(),
            group_id: None,
        }
    }

    pub fn with_subreddit(mut self, subreddit: impl Into<String>) -> Self {
        self.subreddit = subreddit.into();
        self
    }

    /// Caption template; `${url}` is the post's short URL.
    pub fn with_caption(mut self, caption_template: impl Into<String>) -> Self {
        self.caption_template = caption_template.into();
        self
    }

    pub fn with_group_id(mut self, group_id: Option<i64>) -> Self {
        self.group_id = group_id;
        self
    }

    pub async fn resolve_chat(&self, explicit: Option<i64>) -> Result<Chat> {
        resolve_chat(explicit, self.group_id, &self.runtime_info).await
    }

    /// Ranked image posts from the last 24 hours.
    #[instrument(skip(self), fields(subreddit = %self.subreddit))]
    pub async fn candidates(&self) -> Result<Vec<Post>> {
        let cutoff = Utc::now() - Duration::hours(24);
        let posts = self
            .source
            .posts_since(&self.subreddit, cutoff)
            .await
            .map_err(reddit_error)?;
        let total = posts.len();
        let candidates = select_candidates(posts);
        debug!(total, candidates = candidates.len(), "Posts fetched");
        Ok(candidates)
    }

    /// Posts the best picture of the day and records it as the daily post.
    #[instrument(skip(self))]
    pub async fn send_best_today(&self, chat: Option<i64>) -> Result<String> {
        let chat = self.resolve_chat(chat).await?;
        let message_id = self.deliver(&chat).await?;

        let id = message_id
            .parse::<i64>()
            .map_err(|_| KeybotError::Bot(format!("Invalid message id: {}", message_id)))?;
        self.runtime_info
            .record_daily_post(id)
            .await
            .map_err(storage_error)?;
        info!(chat_id = chat.id, message_id = %message_id, "Daily best posted");
        Ok(message_id)
    }

    /// Posts today's best picture into `chat` without recording it.
    #[instrument(skip(self, chat), fields(chat_id = chat.id))]
    pub async fn preview(&self, chat: &Chat) -> Result<String> {
        self.deliver(chat).await
    }

    async fn deliver(&self, chat: &Chat) -> Result<String> {
        let candidates = self.candidates().await?;
        deliver_first(
            self.bot.as_ref(),
            &self.preparer,
            chat,
            &candidates,
            &self.caption_template,
        )
        .await
    }
}
