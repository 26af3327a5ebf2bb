//! # Reddit client
//!
//! Minimal Reddit API access for fetching a subreddit's recent submissions.
//!
//! ## Flow
//!
//! 1. [`RedditClient::authenticate_userless`] (or the code flow for a user token) → [`Session`]
//! 2. [`Session::posts_since`] pages `/r/<sub>/new` back to a cutoff
//! 3. [`Session::revoke`] logs out
//!
//! [`RedditPostSource`] wraps the three steps behind the [`PostSource`] trait.

mod client;
mod error;
mod post;
mod source;

pub use client::{Endpoints, Page, PostSorting, RedditClient, Session};
pub use error::RedditError;
pub use post::Post;
pub use source::{PostSource, RedditPostSource};
