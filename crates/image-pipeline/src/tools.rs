//! External tools: ImageMagick for probing and resizing, a downloader for fetching.

use std::ffi::OsStr;
use std::fmt;
use std::path::Path;
use std::process::Output;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::ImageError;
use crate::limits::ImageLimits;

/// Width and height of an image in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    /// Parses `magick identify -format %wx%h` output, e.g. `"1920x1080"`.
    pub fn parse(s: &str) -> Result<Self, ImageError> {
        let invalid = || ImageError::InvalidSize(s.to_string());
        let (width, height) = s.trim().split_once('x').ok_or_else(invalid)?;
        Ok(Self {
            width: width.parse().map_err(|_| invalid())?,
            height: height.parse().map_err(|_| invalid())?,
        })
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Inspect, fetch and resize operations used by [`crate::PhotoPreparer`].
#[async_trait]
pub trait ImageTools: Send + Sync {
    /// Dimensions of the image at `uri` (URL or local path) without decoding pixel data.
    async fn identify(&self, uri: &str) -> Result<Dimensions, ImageError>;

    /// Downloads `uri` into `dest`, overwriting it.
    async fn download(&self, uri: &str, dest: &Path) -> Result<(), ImageError>;

    /// Writes a resized JPEG of `src` to `dst` according to `limits`.
    async fn resize(&self, src: &Path, dst: &Path, limits: &ImageLimits) -> Result<(), ImageError>;
}

/// [`ImageTools`] backed by the `magick` and `curl` executables.
#[derive(Debug, Clone)]
pub struct ExternalTools {
    magick: String,
    downloader: String,
}

impl Default for ExternalTools {
    fn default() -> Self {
        Self::new("magick", "curl")
    }
}

impl ExternalTools {
    pub fn new(magick: impl Into<String>, downloader: impl Into<String>) -> Self {
        Self {
            magick: magick.into(),
            downloader: downloader.into(),
        }
    }

    async fn run<I, S>(&self, program: &str, args: I) -> Result<Output, ImageError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let output = Command::new(program)
            .args(args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| ImageError::ToolSpawn {
                tool: program.to_string(),
                message: e.to_string(),
            })?;

        if output.status.success() {
            return Ok(output);
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        warn!(tool = program, stderr = %stderr.trim(), "External tool failed");
        match output.status.code() {
            Some(code) => Err(ImageError::ToolFailed {
                tool: program.to_string(),
                code,
            }),
            None => Err(ImageError::ToolTerminated {
                tool: program.to_string(),
            }),
        }
    }
}

#[async_trait]
impl ImageTools for ExternalTools {
    async fn identify(&self, uri: &str) -> Result<Dimensions, ImageError> {
        let output = self
            .run(&self.magick, ["identify", "-ping", "-format", "%wx%h", uri])
            .await?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        debug!(uri, output = %stdout, "magick identify");
        Dimensions::parse(&stdout)
    }

    async fn download(&self, uri: &str, dest: &Path) -> Result<(), ImageError> {
        let dest = dest.as_os_str();
        let args: [&OsStr; 7] = [
            OsStr::new("--silent"),
            OsStr::new("--fail"),
            OsStr::new("--location"),
            OsStr::new("-o"),
            dest,
            OsStr::new("--"),
            OsStr::new(uri),
        ];
        self.run(&self.downloader, args).await?;
        Ok(())
    }

    async fn resize(&self, src: &Path, dst: &Path, limits: &ImageLimits) -> Result<(), ImageError> {
        let bounds = format!("{0}x{0}", limits.resize_target);
        let quality = limits.resize_quality.to_string();
        let args: [&OsStr; 10] = [
            OsStr::new("convert"),
            src.as_os_str(),
            OsStr::new("-limit"),
            OsStr::new("memory"),
            OsStr::new(&limits.memory_limit),
            OsStr::new("-resize"),
            OsStr::new(&bounds),
            OsStr::new("-quality"),
            OsStr::new(&quality),
            dst.as_os_str(),
        ];
        self.run(&self.magick, args).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dimensions() {
        assert_eq!(
            Dimensions::parse("1920x1080").unwrap(),
            Dimensions { width: 1920, height: 1080 }
        );
        assert_eq!(Dimensions::parse(" 10x20\n").unwrap().to_string(), "10x20");
    }

    #[test]
    fn test_parse_invalid_dimensions() {
        for s in ["", "1920", "x1080", "axb", "10x-2", "10X20"] {
            assert!(
                matches!(Dimensions::parse(s), Err(ImageError::InvalidSize(_))),
                "{:?} should be invalid",
                s
            );
        }
    }

    #[tokio::test]
    async fn test_missing_binary_is_spawn_error() {
        let tools = ExternalTools::new("/nonexistent/keybot-magick", "/nonexistent/keybot-curl");
        let result = tools.identify("https://example.com/a.jpg").await;
        assert!(matches!(result, Err(ImageError::ToolSpawn { .. })));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_zero_exit_is_tool_failed() {
        let tools = ExternalTools::new("false", "true");
        let result = tools.identify("a.jpg").await;
        assert!(matches!(result, Err(ImageError::ToolFailed { code: 1, .. })));

        let dest = std::env::temp_dir().join("keybot-download-test");
        assert!(tools.download("https://example.com/a.jpg", &dest).await.is_ok());
    }
}
