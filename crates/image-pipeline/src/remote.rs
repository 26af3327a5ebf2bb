//! Remote file size lookup.

use reqwest::header::{HeaderMap, CONTENT_LENGTH};
use reqwest::Client;
use tempfile::TempPath;
use tracing::{debug, info};

use crate::error::ImageError;
use crate::tools::ImageTools;

/// Size of a remote file, with the local copy when one had to be downloaded to measure it.
#[derive(Debug)]
pub struct RemoteSize {
    pub size: u64,
    pub local: Option<TempPath>,
}

/// Asks the server for the size with `HEAD`; without `Content-Length` the file is downloaded
/// into a temp file and measured, and the temp file is handed back for reuse.
pub async fn remote_file_size(
    client: &Client,
    tools: &dyn ImageTools,
    uri: &str,
) -> Result<RemoteSize, ImageError> {
    let response = client
        .head(uri)
        .send()
        .await
        .map_err(|e| ImageError::Http {
            uri: uri.to_string(),
            message: e.to_string(),
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(ImageError::Status {
            uri: uri.to_string(),
            status: status.as_u16(),
        });
    }

    size_from_headers(tools, uri, response.headers()).await
}

/// Uses `Content-Length` when present, otherwise downloads `uri` and measures the local copy.
pub(crate) async fn size_from_headers(
    tools: &dyn ImageTools,
    uri: &str,
    headers: &HeaderMap,
) -> Result<RemoteSize, ImageError> {
    if let Some(size) = content_length(headers, uri)? {
        debug!(uri, size, "Got file size from header");
        return Ok(RemoteSize { size, local: None });
    }

    let local = temp_path("")?;
    info!(uri, path = %local.display(), "Downloading to measure size");
    tools.download(uri, &local).await?;
    let size = tokio::fs::metadata(&local).await?.len();
    Ok(RemoteSize {
        size,
        local: Some(local),
    })
}

/// `Content-Length` as bytes; `None` when the header is absent.
pub(crate) fn content_length(headers: &HeaderMap, uri: &str) -> Result<Option<u64>, ImageError> {
    let Some(value) = headers.get(CONTENT_LENGTH) else {
        return Ok(None);
    };
    let invalid = || ImageError::InvalidContentLength {
        uri: uri.to_string(),
        value: String::from_utf8_lossy(value.as_bytes()).into_owned(),
    };
    let text = value.to_str().map_err(|_| invalid())?;
    text.trim().parse().map(Some).map_err(|_| invalid())
}

/// An empty `keybot-*` temp file that is deleted when the returned path is dropped.
pub(crate) fn temp_path(suffix: &str) -> Result<TempPath, ImageError> {
    let file = tempfile::Builder::new()
        .prefix("keybot-")
        .suffix(suffix)
        .tempfile()?;
    Ok(file.into_temp_path())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_content_length_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(content_length(&headers, "u").unwrap(), None);

        headers.insert(CONTENT_LENGTH, HeaderValue::from_static("12345"));
        assert_eq!(content_length(&headers, "u").unwrap(), Some(12345));

        headers.insert(CONTENT_LENGTH, HeaderValue::from_static("lots"));
        assert!(matches!(
            content_length(&headers, "u"),
            Err(ImageError::InvalidContentLength { .. })
        ));
    }

    struct WritingTools;

    #[async_trait::async_trait]
    impl ImageTools for WritingTools {
        async fn identify(&self, _uri: &str) -> Result<crate::Dimensions, ImageError> {
            Ok(crate::Dimensions {
                width: 1,
                height: 1,
            })
        }

        async fn download(&self, _uri: &str, dest: &std::path::Path) -> Result<(), ImageError> {
            tokio::fs::write(dest, vec![7u8; 300]).await?;
            Ok(())
        }

        async fn resize(
            &self,
            _src: &std::path::Path,
            _dst: &std::path::Path,
            _limits: &crate::ImageLimits,
        ) -> Result<(), ImageError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_missing_content_length_downloads_and_measures() {
        let remote = size_from_headers(&WritingTools, "u", &HeaderMap::new())
            .await
            .unwrap();

        assert_eq!(remote.size, 300);
        let local = remote.local.expect("downloaded copy is handed back");
        let path = local.to_path_buf();
        assert!(path.exists());
        drop(local);
        assert!(!path.exists());
    }

    #[test]
    fn test_temp_path_suffix_and_cleanup() {
        let path = temp_path(".jpg").unwrap();
        let owned = path.to_path_buf();
        assert!(owned.exists());
        assert_eq!(owned.extension().and_then(|e| e.to_str()), Some("jpg"));
        drop(path);
        assert!(!owned.exists());
    }
}
