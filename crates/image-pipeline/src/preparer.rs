//! Turns a candidate image URL into something Telegram will accept.

use std::sync::Arc;

use reqwest::Client;
use tempfile::TempPath;
use tracing::{debug, info, instrument};

use crate::error::ImageError;
use crate::limits::ImageLimits;
use crate::remote::{remote_file_size, temp_path};
use crate::tools::ImageTools;

/// A photo ready to send.
#[derive(Debug)]
pub enum PreparedPhoto {
    /// Small enough: Telegram fetches the URL itself.
    Remote(String),
    /// Resized local JPEG; deleted when dropped, so keep it alive until the upload finishes.
    Resized(TempPath),
}

/// Measures a remote image and resizes it when it exceeds [`ImageLimits`].
#[derive(Clone)]
pub struct PhotoPreparer {
    client: Client,
    tools: Arc<dyn ImageTools>,
    limits: ImageLimits,
}

impl PhotoPreparer {
    pub fn new(client: Client, tools: Arc<dyn ImageTools>, limits: ImageLimits) -> Self {
        Self {
            client,
            tools,
            limits,
        }
    }

    pub fn limits(&self) -> &ImageLimits {
        &self.limits
    }

    /// Any failure is returned so the caller can try another image.
    #[instrument(skip(self))]
    pub async fn prepare(&self, uri: &str) -> Result<PreparedPhoto, ImageError> {
        let dimensions = self.tools.identify(uri).await?;
        debug!(%dimensions, "Image size");
        let remote = remote_file_size(&self.client, self.tools.as_ref(), uri).await?;

        if self.limits.fits(dimensions, remote.size) {
            return Ok(PreparedPhoto::Remote(uri.to_string()));
        }

        info!(%dimensions, size = remote.size, "Processing large image file");
        let original = match remote.local {
            Some(local) => local,
            None => {
                let local = temp_path("")?;
                self.tools.download(uri, &local).await?;
                local
            }
        };

        info!(target_size = self.limits.resize_target, "Resizing image");
        let resized = temp_path(".jpg")?;
        let result = self.tools.resize(&original, &resized, &self.limits).await;
        drop(original);
        result?;

        Ok(PreparedPhoto::Resized(resized))
    }
}
