//! Segmentation backends for subject/background separation
//!
//! The pipeline treats background removal as an opaque capability: an RGB
//! image goes in, an RGBA image with a subject-vs-background alpha channel
//! comes out. Two implementations exist:
//! - `TractSegmenter` (feature `tract`): pure Rust ONNX inference
//! - `IdentitySegmenter`: pass-through with full opacity, used whenever a
//!   real backend is unavailable at build or run time

#[cfg(feature = "tract")]
pub mod tract;

mod identity;

pub use identity::IdentitySegmenter;

#[cfg(feature = "tract")]
pub use tract::TractSegmenter;

use crate::config::StudioConfig;
use crate::error::Result;
use image::{RgbImage, RgbaImage};

/// Subject/background separation capability
///
/// Implementations hold any expensive state (model sessions) themselves, so
/// a single instance can be constructed at process startup and reused across
/// invocations.
pub trait Segmenter {
    /// Produce a 4-channel image whose alpha channel approximates
    /// subject-vs-background separation
    ///
    /// # Errors
    /// Inference failures propagate unchanged; there are no retries.
    fn segment(&self, image: &RgbImage) -> Result<RgbaImage>;

    /// Backend name for diagnostics
    fn name(&self) -> &'static str;
}

/// Select a segmentation backend once, based on availability
///
/// With the `tract` feature enabled and a configured model file present on
/// disk, returns the real segmenter; in every other case it degrades to the
/// identity segmenter without emitting a warning.
///
/// # Errors
/// Model loading failures (corrupt or incompatible model file) propagate;
/// a merely *absent* capability is not an error.
pub fn create_segmenter(config: &StudioConfig) -> Result<Box<dyn Segmenter>> {
    #[cfg(feature = "tract")]
    if let Some(model_path) = &config.model_path {
        if model_path.exists() {
            let segmenter = TractSegmenter::from_model_path(model_path)?;
            return Ok(Box::new(segmenter));
        }
        tracing::debug!(
            model = %model_path.display(),
            "segmentation model not found, using identity segmenter"
        );
    }

    #[cfg(not(feature = "tract"))]
    let _ = config;

    Ok(Box::new(IdentitySegmenter::new()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_degrades_without_model() {
        let config = StudioConfig::default();
        let segmenter = create_segmenter(&config).unwrap();
        assert_eq!(segmenter.name(), "identity");
    }

    #[test]
    fn test_factory_degrades_on_missing_model_file() {
        let config = StudioConfig::builder()
            .model_path("/nonexistent/model.onnx")
            .build()
            .unwrap();
        let segmenter = create_segmenter(&config).unwrap();
        assert_eq!(segmenter.name(), "identity");
    }
}
