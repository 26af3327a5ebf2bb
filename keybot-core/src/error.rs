//! Error types for the bot core.
//!
//! [`KeybotError`] is the top-level error; [`HandlerError`] is used for handler failures.
//! Crate-specific errors (reddit, image, storage) are carried as strings so core stays free of
//! their dependencies.

use thiserror::Error;

/// Top-level error (bot transport, handler, config, storage, reddit, image, IO).
#[derive(Error, Debug)]
pub enum KeybotError {
    #[error("Bot error: {0}")]
    Bot(String),

    #[error("Handler error: {0}")]
    Handler(#[from] HandlerError),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Reddit error: {0}")]
    Reddit(String),

    #[error("Image error: {0}")]
    Image(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No deliverable candidate: {0}")]
    NoCandidate(String),
}

/// Errors produced by handlers.
#[derive(Error, Debug)]
pub enum HandlerError {
    #[error("No welcome message set")]
    EmptyTemplate,

    #[error("State error: {0}")]
    State(String),
}

/// Result type for core operations; uses [`KeybotError`].
pub type Result<T> = std::result::Result<T, KeybotError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handler_error_wraps_into_keybot_error() {
        let err: KeybotError = HandlerError::EmptyTemplate.into();
        assert!(matches!(err, KeybotError::Handler(HandlerError::EmptyTemplate)));
        assert_eq!(err.to_string(), "Handler error: No welcome message set");

        let err: KeybotError = HandlerError::State("Invalid wa_to: x".to_string()).into();
        assert_eq!(err.to_string(), "Handler error: State error: Invalid wa_to: x");
    }
}
