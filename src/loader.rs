//! Input image acquisition
//!
//! Resolves the raw input reference (URL or local path), fetches the bytes,
//! and normalizes the decoded image to opaque 3-channel RGB. Every failure in
//! this stage is fatal for the run.

use crate::error::Result;
use image::RgbImage;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

/// Timeout for fetching a remote input image
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Browser-like identifying header sent with image requests; some product
/// image hosts reject requests without one
const USER_AGENT: &str = "Mozilla/5.0";

/// Where an input image comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// HTTP(S) URL fetched over the network
    Url(String),
    /// Local filesystem path
    Path(PathBuf),
}

impl ImageSource {
    /// Classify a raw input reference
    ///
    /// Anything starting with `http` is treated as a URL (covering both
    /// `http://` and `https://`); everything else is a local path.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        if input.starts_with("http") {
            Self::Url(input.to_string())
        } else {
            Self::Path(PathBuf::from(input))
        }
    }
}

impl std::fmt::Display for ImageSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Url(url) => write!(f, "{url}"),
            Self::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Loads input images from URLs or local paths
pub struct ImageLoader {
    client: reqwest::blocking::Client,
}

impl ImageLoader {
    /// Create a loader with its HTTP client configured for image fetching
    ///
    /// # Errors
    /// Returns a network error when the TLS backend fails to initialize.
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(FETCH_TIMEOUT)
            .build()?;
        Ok(Self { client })
    }

    /// Load an image from the given source and normalize it to RGB8
    ///
    /// Any existing alpha channel in the input is discarded.
    ///
    /// # Errors
    /// - Network failures, non-success HTTP status, or timeout (URL input)
    /// - Missing or unreadable file (path input)
    /// - Malformed image bytes
    pub fn load(&self, source: &ImageSource) -> Result<RgbImage> {
        let image = match source {
            ImageSource::Url(url) => {
                debug!(url = %url, "fetching input image");
                let bytes = self
                    .client
                    .get(url)
                    .send()?
                    .error_for_status()?
                    .bytes()?;
                image::load_from_memory(&bytes)?
            },
            ImageSource::Path(path) => {
                debug!(path = %path.display(), "opening input image");
                image::open(path)?
            },
        };

        let rgb = image.to_rgb8();
        debug!(
            width = rgb.width(),
            height = rgb.height(),
            "input image loaded"
        );
        Ok(rgb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_classification() {
        assert_eq!(
            ImageSource::parse("https://example.com/a.jpg"),
            ImageSource::Url("https://example.com/a.jpg".to_string())
        );
        assert_eq!(
            ImageSource::parse("http://example.com/a.jpg"),
            ImageSource::Url("http://example.com/a.jpg".to_string())
        );
        assert_eq!(
            ImageSource::parse("photos/item.png"),
            ImageSource::Path(PathBuf::from("photos/item.png"))
        );
        assert_eq!(
            ImageSource::parse("/abs/path.jpg"),
            ImageSource::Path(PathBuf::from("/abs/path.jpg"))
        );
    }

    #[test]
    fn test_source_display() {
        let url = ImageSource::parse("https://example.com/a.jpg");
        assert_eq!(url.to_string(), "https://example.com/a.jpg");

        let path = ImageSource::parse("item.png");
        assert_eq!(path.to_string(), "item.png");
    }

    #[test]
    fn test_load_missing_file_is_fatal() {
        let loader = ImageLoader::new().unwrap();
        let source = ImageSource::parse("/nonexistent/item.png");
        assert!(loader.load(&source).is_err());
    }

    #[test]
    fn test_load_local_file_discards_alpha() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.png");

        let rgba = image::RgbaImage::from_pixel(4, 4, image::Rgba([10, 20, 30, 128]));
        rgba.save(&path).unwrap();

        let loader = ImageLoader::new().unwrap();
        let loaded = loader
            .load(&ImageSource::Path(path))
            .unwrap();
        assert_eq!(loaded.dimensions(), (4, 4));
        // Alpha channel is gone; color values survive
        assert_eq!(loaded.get_pixel(0, 0).0, [10, 20, 30]);
    }

    #[test]
    fn test_load_malformed_bytes_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not an image").unwrap();

        let loader = ImageLoader::new().unwrap();
        assert!(loader.load(&ImageSource::Path(path)).is_err());
    }
}
