//! Telegram photo limits and resize parameters.

use crate::tools::Dimensions;

/// Photos at or above these limits are downloaded and resized before upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageLimits {
    /// Exclusive upper bound on width and height, in pixels.
    pub max_dimension: u32,
    /// Exclusive upper bound on file size, in bytes.
    pub max_file_size: u64,
    /// Resized images fit in a `resize_target` x `resize_target` box.
    pub resize_target: u32,
    /// JPEG quality for resized images.
    pub resize_quality: u8,
    /// Value for `magick -limit memory`.
    pub memory_limit: String,
}

impl Default for ImageLimits {
    fn default() -> Self {
        Self {
            max_dimension: 4096,
            max_file_size: 5 * 1024 * 1024,
            resize_target: 1024,
            resize_quality: 92,
            memory_limit: "100MiB".to_string(),
        }
    }
}

impl ImageLimits {
    /// Whether Telegram accepts a photo of this size by URL as is.
    pub fn fits(&self, dimensions: Dimensions, file_size: u64) -> bool {
        dimensions.width < self.max_dimension
            && dimensions.height < self.max_dimension
            && file_size < self.max_file_size
    }
}
