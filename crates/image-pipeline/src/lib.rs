//! # Image pipeline
//!
//! Prepares remote images for Telegram's photo limits: read dimensions with `magick identify`,
//! measure the file with `HEAD` (or a download), and resize with `magick convert` when either
//! is too large.

mod error;
mod limits;
mod preparer;
mod remote;
mod tools;

pub use error::ImageError;
pub use limits::ImageLimits;
pub use preparer::{PhotoPreparer, PreparedPhoto};
pub use remote::{remote_file_size, RemoteSize};
pub use tools::{Dimensions, ExternalTools, ImageTools};
