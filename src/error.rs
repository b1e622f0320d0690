//! Error types for product photo processing

use thiserror::Error;

/// Result type alias for product photo processing operations
pub type Result<T> = std::result::Result<T, ProductShotError>;

/// Error types for the product photo pipeline
#[derive(Error, Debug)]
pub enum ProductShotError {
    /// Input/output errors (file not found, permission denied, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Image decoding or encoding errors
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Network errors while fetching the input image
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Segmentation backend errors (model loading or inference)
    #[error("Segmentation error: {0}")]
    Segmentation(String),

    /// Invalid configuration or parameters
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Image transformation errors (trim, compositing, flattening)
    #[error("Processing error: {0}")]
    Processing(String),
}

impl ProductShotError {
    /// Create a new segmentation error
    pub fn segmentation<S: Into<String>>(msg: S) -> Self {
        Self::Segmentation(msg.into())
    }

    /// Create a new invalid configuration error
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a new processing error
    pub fn processing<S: Into<String>>(msg: S) -> Self {
        Self::Processing(msg.into())
    }

    /// Create a file I/O error with operation context
    pub fn file_io_error<P: AsRef<std::path::Path>>(
        operation: &str,
        path: P,
        error: std::io::Error,
    ) -> Self {
        let path_display = path.as_ref().display();
        Self::Io(std::io::Error::new(
            error.kind(),
            format!("Failed to {operation} '{path_display}': {error}"),
        ))
    }
}
