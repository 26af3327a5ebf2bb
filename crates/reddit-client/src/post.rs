//! Reddit posts and the listing JSON they come from.

use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;

const REDDIT_WWW: &str = "https://www.reddit.com";
const IMAGE_EXTENSIONS: [&str; 3] = [".jpg", ".jpeg", ".png"];

/// One submission from a subreddit listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub title: String,
    /// Self text; empty for link posts.
    pub text: String,
    pub author: String,
    pub score: i64,
    /// Path of the post itself, e.g. `/r/MechanicalKeyboards/comments/abc/title/`.
    pub permalink: String,
    /// URL the post links to; for self posts this is the post's own URL.
    pub link: String,
    pub hide_score: bool,
    /// Fullname, e.g. `t3_abc`.
    pub name: String,
    pub num_comments: u64,
    pub created: DateTime<Utc>,
    pub subreddit: String,
}

impl Post {
    /// The fullname used for `before` / `after` paging.
    pub fn full_name(&self) -> &str {
        &self.name
    }

    /// False for self posts, whose link points back at the post's own comments page.
    pub fn is_link(&self) -> bool {
        let comments_prefix = format!("{}/r/{}/comments", REDDIT_WWW, self.subreddit);
        if self.link.starts_with(&comments_prefix) {
            return self.link[REDDIT_WWW.len()..] != self.permalink;
        }
        true
    }

    /// `https://reddit.com/r/<sub>/comments/<id>/`, id being the fullname without its kind prefix.
    pub fn short_url(&self) -> String {
        let id = self
            .name
            .split_once('_')
            .map(|(_, id)| id)
            .unwrap_or(&self.name);
        format!("https://reddit.com/r/{}/comments/{}/", self.subreddit, id)
    }

    /// Link post whose URL ends in `.jpg`, `.jpeg` or `.png` (case-insensitive).
    pub fn is_image_link(&self) -> bool {
        if !self.is_link() {
            return false;
        }
        let link = self.link.to_lowercase();
        IMAGE_EXTENSIONS.iter().any(|ext| link.ends_with(ext))
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct Listing {
    pub data: ListingData,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListingData {
    #[serde(default)]
    pub children: Vec<Thing>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Thing {
    pub data: PostData,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PostData {
    title: String,
    #[serde(default)]
    selftext: String,
    author: String,
    score: i64,
    permalink: String,
    url: String,
    #[serde(default)]
    hide_score: bool,
    name: String,
    #[serde(default)]
    num_comments: u64,
    created_utc: f64,
    subreddit: String,
}

impl From<PostData> for Post {
    fn from(data: PostData) -> Self {
        let created = Utc
            .timestamp_opt(data.created_utc as i64, 0)
            .single()
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
        Self {
            title: data.title,
            text: data.selftext,
            author: data.author,
            score: data.score,
            permalink: data.permalink,
            link: data.url,
            hide_score: data.hide_score,
            name: data.name,
            num_comments: data.num_comments,
            created,
            subreddit: data.subreddit,
        }
    }
}

impl Listing {
    pub fn into_posts(self) -> Vec<Post> {
        self.data
            .children
            .into_iter()
            .map(|thing| Post::from(thing.data))
            .collect()
    }
}
