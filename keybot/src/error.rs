//! Maps library errors into [`KeybotError`] at the application boundary.

use image_pipeline::ImageError;
use keybot_core::KeybotError;
use reddit_client::RedditError;
use storage::StorageError;

pub(crate) fn storage_error(err: StorageError) -> KeybotError {
    KeybotError::Storage(err.to_string())
}

pub(crate) fn reddit_error(err: RedditError) -> KeybotError {
    KeybotError::Reddit(err.to_string())
}

pub(crate) fn image_error(err: ImageError) -> KeybotError {
    KeybotError::Image(err.to_string())
}
