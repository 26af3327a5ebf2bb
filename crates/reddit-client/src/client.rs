//! OAuth and listing calls against the Reddit API.
//!
//! Reddit requires every API call to be authenticated, even read-only listing of a public
//! subreddit. [`RedditClient`] performs the token exchange and hands out a [`Session`] carrying
//! the bearer token.

use chrono::{DateTime, Utc};
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use crate::error::RedditError;
use crate::post::{Listing, Post};

const DEFAULT_AUTH_BASE: &str = "https://www.reddit.com";
const DEFAULT_API_BASE: &str = "https://oauth.reddit.com";
const DEFAULT_PAGE_SIZE: u32 = 50;
const DEFAULT_MAX_PAGES: usize = 20;

/// Base URLs for the token endpoints and the OAuth API.
#[derive(Debug, Clone)]
pub struct Endpoints {
    /// Hosts `/api/v1/access_token`, `/api/v1/authorize` and `/api/v1/revoke_token`.
    pub auth_base: String,
    /// Hosts listings such as `/r/<sub>/new.json`.
    pub api_base: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            auth_base: DEFAULT_AUTH_BASE.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }
}

/// Listing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostSorting {
    Hot,
    New,
}

impl PostSorting {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostSorting::Hot => "hot",
            PostSorting::New => "new",
        }
    }
}

/// Which slice of a listing to fetch, anchored on a post fullname.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    First,
    Before(String),
    After(String),
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
}

/// Unauthenticated entry point: builds sessions.
#[derive(Debug, Clone)]
pub struct RedditClient {
    client: Client,
    endpoints: Endpoints,
}

impl RedditClient {
    /// Client against the public Reddit endpoints. Reddit rejects requests without a
    /// descriptive user agent.
    pub fn new(user_agent: &str) -> Result<Self, RedditError> {
        Self::with_endpoints(user_agent, Endpoints::default())
    }

    pub fn with_endpoints(user_agent: &str, endpoints: Endpoints) -> Result<Self, RedditError> {
        let client = Client::builder().user_agent(user_agent).build()?;
        Ok(Self { client, endpoints })
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Application-only OAuth (`client_credentials`).
    #[instrument(skip(self, client_secret))]
    pub async fn authenticate_userless(
        &self,
        client_id: &str,
        client_secret: &str,
    ) -> Result<Session, RedditError> {
        debug!("Authenticating on Reddit (userless)");
        let token = self
            .request_token(
                client_id,
                client_secret,
                &[("grant_type", "client_credentials")],
            )
            .await?;
        Ok(self.session(token))
    }

    /// URL the user opens to grant access; Reddit redirects back with `code` and `state`.
    pub fn authorize_url(
        &self,
        client_id: &str,
        state: &str,
        redirect_uri: &str,
        scopes: &[&str],
    ) -> Result<String, RedditError> {
        let scope = scopes.join(" ");
        let url = Url::parse_with_params(
            &format!("{}/api/v1/authorize", self.endpoints.auth_base),
            &[
                ("client_id", client_id),
                ("response_type", "code"),
                ("state", state),
                ("redirect_uri", redirect_uri),
                ("duration", "permanent"),
                ("scope", scope.as_str()),
            ],
        )
        .map_err(|e| RedditError::Auth(format!("Invalid authorize URL: {}", e)))?;
        Ok(url.to_string())
    }

    /// Exchanges an authorization code for a session; the refresh token is kept when issued.
    #[instrument(skip(self, client_secret, code))]
    pub async fn authenticate_with_code(
        &self,
        client_id: &str,
        client_secret: &str,
        code: &str,
        redirect_uri: &str,
    ) -> Result<Session, RedditError> {
        let token = self
            .request_token(
                client_id,
                client_secret,
                &[
                    ("grant_type", "authorization_code"),
                    ("code", code),
                    ("redirect_uri", redirect_uri),
                ],
            )
            .await?;
        Ok(self.session(token))
    }

    async fn request_token(
        &self,
        client_id: &str,
        client_secret: &str,
        form: &[(&str, &str)],
    ) -> Result<TokenResponse, RedditError> {
        let response = self
            .client
            .post(format!("{}/api/v1/access_token", self.endpoints.auth_base))
            .basic_auth(client_id, Some(client_secret))
            .form(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            warn!(status = status.as_u16(), "Reddit token request rejected");
            return Err(RedditError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| RedditError::Parse(e.to_string()))
    }

    fn session(&self, token: TokenResponse) -> Session {
        Session {
            client: self.client.clone(),
            endpoints: self.endpoints.clone(),
            token: token.access_token,
            refresh_token: token.refresh_token,
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }
}

/// An authenticated connection to the OAuth API.
#[derive(Debug, Clone)]
pub struct Session {
    client: Client,
    endpoints: Endpoints,
    token: String,
    refresh_token: Option<String>,
    page_size: u32,
    max_pages: usize,
}

impl Session {
    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Upper bound on pages fetched by [`Session::posts_since`].
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    /// One page of `/r/<subreddit>/<sorting>`.
    #[instrument(skip(self), fields(sorting = sorting.as_str()))]
    pub async fn list(
        &self,
        subreddit: &str,
        sorting: PostSorting,
        page: Page,
    ) -> Result<Vec<Post>, RedditError> {
        let limit = self.page_size.to_string();
        let mut query: Vec<(&str, &str)> = vec![("g", "GLOBAL")];
        match &page {
            Page::First => {}
            Page::Before(name) => query.push(("before", name.as_str())),
            Page::After(name) => query.push(("after", name.as_str())),
        }
        query.push(("limit", limit.as_str()));
        query.push(("raw_json", "1"));

        let response = self
            .client
            .get(format!(
                "{}/r/{}/{}.json",
                self.endpoints.api_base,
                subreddit,
                sorting.as_str()
            ))
            .header("Authorization", format!("bearer {}", self.token))
            .query(&query)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            warn!(status = status.as_u16(), subreddit, "Reddit listing request failed");
            return Err(RedditError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let listing: Listing =
            serde_json::from_str(&body).map_err(|e| RedditError::Parse(e.to_string()))?;
        let posts = listing.into_posts();
        debug!(count = posts.len(), "Listing page fetched");
        Ok(posts)
    }

    /// All posts in `/new` created after `cutoff`, newest first.
    ///
    /// Pages with `after=<last fullname>` until the last post on hand is at or before `cutoff`,
    /// a page comes back empty, or the page cap is hit; then drops everything after the last
    /// post newer than `cutoff`.
    #[instrument(skip(self))]
    pub async fn posts_since(
        &self,
        subreddit: &str,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<Post>, RedditError> {
        let mut posts = self.list(subreddit, PostSorting::New, Page::First).await?;
        let mut pages = 1;

        while let Some(last) = posts.last() {
            if last.created <= cutoff {
                break;
            }
            if pages >= self.max_pages {
                warn!(pages, "Page cap reached before the cutoff");
                break;
            }
            let after = last.full_name().to_string();
            let page = self
                .list(subreddit, PostSorting::New, Page::After(after))
                .await?;
            pages += 1;
            if page.is_empty() {
                debug!("Empty page, listing exhausted");
                break;
            }
            posts.extend(page);
        }

        match posts.iter().rposition(|p| p.created > cutoff) {
            Some(idx) => posts.truncate(idx + 1),
            None => posts.clear(),
        }
        info!(count = posts.len(), pages, "Fetched posts since cutoff");
        Ok(posts)
    }

    /// Revokes the access token.
    pub async fn revoke(&self, client_id: &str, client_secret: &str) -> Result<(), RedditError> {
        debug!("Logging out of Reddit");
        let response = self
            .client
            .post(format!("{}/api/v1/revoke_token", self.endpoints.auth_base))
            .basic_auth(client_id, Some(client_secret))
            .form(&[
                ("token", self.token.as_str()),
                ("token_type_hint", "access_token"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(RedditError::Status(response.status().as_u16()));
        }
        Ok(())
    }
}
