//! Post sources: where the daily-best pipeline gets its posts from.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::warn;

use crate::client::RedditClient;
use crate::error::RedditError;
use crate::post::Post;

/// Yields the posts of a subreddit created after a cutoff, newest first.
#[async_trait]
pub trait PostSource: Send + Sync {
    async fn posts_since(
        &self,
        subreddit: &str,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<Post>, RedditError>;
}

/// Live source: authenticates userless, pages the listing, then revokes the token.
pub struct RedditPostSource {
    client: RedditClient,
    client_id: String,
    client_secret: String,
}

impl RedditPostSource {
    pub fn new(client: RedditClient, client_id: String, client_secret: String) -> Self {
        Self {
            client,
            client_id,
            client_secret,
        }
    }
}

#[async_trait]
impl PostSource for RedditPostSource {
    async fn posts_since(
        &self,
        subreddit: &str,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<Post>, RedditError> {
        let session = self
            .client
            .authenticate_userless(&self.client_id, &self.client_secret)
            .await?;
        let posts = session.posts_since(subreddit, cutoff).await;

        if let Err(e) = session.revoke(&self.client_id, &self.client_secret).await {
            warn!(error = %e, "Failed to revoke Reddit token");
        }
        posts
    }
}
