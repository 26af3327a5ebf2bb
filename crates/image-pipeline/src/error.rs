//! Image pipeline error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImageError {
    /// `WxH` string from `magick identify` could not be parsed.
    #[error("Invalid image size string: {0}")]
    InvalidSize(String),
    #[error("Failed to run {tool}: {message}")]
    ToolSpawn { tool: String, message: String },
    #[error("{tool} failed with {code}")]
    ToolFailed { tool: String, code: i32 },
    #[error("{tool} was terminated")]
    ToolTerminated { tool: String },
    #[error("HTTP error for {uri}: {message}")]
    Http { uri: String, message: String },
    #[error("HEAD {uri} returned status {status}")]
    Status { uri: String, status: u16 },
    #[error("Invalid Content-Length for {uri}: {value}")]
    InvalidContentLength { uri: String, value: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
