//! Reddit client error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RedditError {
    /// Request could not be sent or the body could not be read.
    #[error("Reddit HTTP error: {0}")]
    Http(String),
    /// Reddit answered with a non-success status.
    #[error("Reddit returned status {0}")]
    Status(u16),
    /// Response body is not the expected JSON.
    #[error("Failed to parse Reddit response: {0}")]
    Parse(String),
    /// OAuth flow problem (state mismatch, denied consent, bad URL).
    #[error("Reddit authentication failed: {0}")]
    Auth(String),
}

impl From<reqwest::Error> for RedditError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Self::Status(status.as_u16()),
            None if err.is_decode() => Self::Parse(err.to_string()),
            None => Self::Http(err.to_string()),
        }
    }
}
