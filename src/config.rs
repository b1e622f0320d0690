//! Configuration for the product photo pipeline
//!
//! All spec constants of the standardized listing layout live here with their
//! production defaults: 1024x1024 canvas, (240, 240, 240) background, subject
//! bound at 85% of the canvas, 40% badge opacity at 18% canvas width with a
//! 50 px margin, and a 3x3 erosion kernel run for 3 iterations.

use crate::error::{ProductShotError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for product photo standardization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudioConfig {
    /// Output canvas edge length in pixels (canvas is always square)
    pub canvas_size: u32,

    /// Solid background color the canvas is flattened onto (RGB)
    pub background_color: [u8; 3],

    /// Fraction of the canvas edge the subject's longer side is scaled to
    pub product_size_ratio: f32,

    /// Opacity multiplier applied to the badge's alpha channel
    pub badge_opacity: f32,

    /// Badge width as a fraction of the canvas width
    pub badge_width_ratio: f32,

    /// Distance in pixels between the badge and the canvas's top/right edges
    pub badge_margin: u32,

    /// Radius of the square erosion structuring element (1 = 3x3)
    pub erosion_radius: u8,

    /// Number of erosion passes applied to the alpha channel
    pub erosion_iterations: u32,

    /// JPEG quality for the encoded output (0-100)
    pub jpeg_quality: u8,

    /// Directory holding the grade badge assets; `None` resolves
    /// `assets/grades` relative to the running executable
    pub badge_dir: Option<PathBuf>,

    /// Path to the ONNX segmentation model (used by the `tract` backend);
    /// `None` or a missing file selects the identity segmenter
    pub model_path: Option<PathBuf>,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            canvas_size: 1024,
            background_color: [240, 240, 240],
            product_size_ratio: 0.85,
            badge_opacity: 0.4,
            badge_width_ratio: 0.18,
            badge_margin: 50,
            erosion_radius: 1,
            erosion_iterations: 3,
            jpeg_quality: 95,
            badge_dir: None,
            model_path: None,
        }
    }
}

impl StudioConfig {
    /// Create a new configuration builder
    #[must_use]
    pub fn builder() -> StudioConfigBuilder {
        StudioConfigBuilder::default()
    }

    /// The subject's maximum bounding dimension on the canvas,
    /// `floor(canvas_size * product_size_ratio)`
    #[must_use]
    pub fn max_subject_side(&self) -> u32 {
        (self.canvas_size as f32 * self.product_size_ratio) as u32
    }

    /// Validate all configuration parameters
    ///
    /// # Errors
    /// - Zero canvas size
    /// - Ratios outside `(0, 1]`
    /// - Badge opacity outside `[0, 1]`
    /// - JPEG quality above 100
    pub fn validate(&self) -> Result<()> {
        if self.canvas_size == 0 {
            return Err(ProductShotError::invalid_config(
                "canvas size must be non-zero",
            ));
        }
        if !(self.product_size_ratio > 0.0 && self.product_size_ratio <= 1.0) {
            return Err(ProductShotError::invalid_config(format!(
                "product size ratio must be in (0, 1], got {}",
                self.product_size_ratio
            )));
        }
        if !(self.badge_width_ratio > 0.0 && self.badge_width_ratio <= 1.0) {
            return Err(ProductShotError::invalid_config(format!(
                "badge width ratio must be in (0, 1], got {}",
                self.badge_width_ratio
            )));
        }
        if !(0.0..=1.0).contains(&self.badge_opacity) {
            return Err(ProductShotError::invalid_config(format!(
                "badge opacity must be in [0, 1], got {}",
                self.badge_opacity
            )));
        }
        if self.jpeg_quality > 100 {
            return Err(ProductShotError::invalid_config(format!(
                "JPEG quality must be 0-100, got {}",
                self.jpeg_quality
            )));
        }
        Ok(())
    }
}

/// Builder for [`StudioConfig`]
#[derive(Debug, Default)]
pub struct StudioConfigBuilder {
    config: StudioConfig,
}

impl StudioConfigBuilder {
    /// Set the canvas edge length
    #[must_use]
    pub fn canvas_size(mut self, size: u32) -> Self {
        self.config.canvas_size = size;
        self
    }

    /// Set the background color the output is flattened onto
    #[must_use]
    pub fn background_color(mut self, color: [u8; 3]) -> Self {
        self.config.background_color = color;
        self
    }

    /// Set the subject-to-canvas size ratio
    #[must_use]
    pub fn product_size_ratio(mut self, ratio: f32) -> Self {
        self.config.product_size_ratio = ratio;
        self
    }

    /// Set the badge opacity multiplier
    #[must_use]
    pub fn badge_opacity(mut self, opacity: f32) -> Self {
        self.config.badge_opacity = opacity;
        self
    }

    /// Set the badge width as a fraction of the canvas width
    #[must_use]
    pub fn badge_width_ratio(mut self, ratio: f32) -> Self {
        self.config.badge_width_ratio = ratio;
        self
    }

    /// Set the badge margin in pixels
    #[must_use]
    pub fn badge_margin(mut self, margin: u32) -> Self {
        self.config.badge_margin = margin;
        self
    }

    /// Set the erosion iteration count
    #[must_use]
    pub fn erosion_iterations(mut self, iterations: u32) -> Self {
        self.config.erosion_iterations = iterations;
        self
    }

    /// Set the JPEG quality (clamped to 100)
    #[must_use]
    pub fn jpeg_quality(mut self, quality: u8) -> Self {
        self.config.jpeg_quality = quality.min(100);
        self
    }

    /// Set the badge asset directory
    #[must_use]
    pub fn badge_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.config.badge_dir = Some(dir.into());
        self
    }

    /// Set the segmentation model path
    #[must_use]
    pub fn model_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.config.model_path = Some(path.into());
        self
    }

    /// Build and validate the configuration
    ///
    /// # Errors
    /// Returns [`ProductShotError::InvalidConfig`] when any parameter is out
    /// of range, see [`StudioConfig::validate`].
    pub fn build(self) -> Result<StudioConfig> {
        let config = self.config;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StudioConfig::default();
        assert_eq!(config.canvas_size, 1024);
        assert_eq!(config.background_color, [240, 240, 240]);
        assert_eq!(config.jpeg_quality, 95);
        assert_eq!(config.erosion_iterations, 3);
        assert_eq!(config.erosion_radius, 1);
        assert_eq!(config.badge_margin, 50);
        assert!(config.badge_dir.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_max_subject_side_truncates() {
        let config = StudioConfig::default();
        // 1024 * 0.85 = 870.4, truncated
        assert_eq!(config.max_subject_side(), 870);
    }

    #[test]
    fn test_builder_chaining() {
        let config = StudioConfig::builder()
            .canvas_size(512)
            .background_color([255, 255, 255])
            .product_size_ratio(0.5)
            .badge_opacity(0.25)
            .badge_margin(10)
            .badge_dir("/tmp/badges")
            .build()
            .unwrap();

        assert_eq!(config.canvas_size, 512);
        assert_eq!(config.background_color, [255, 255, 255]);
        assert_eq!(config.badge_margin, 10);
        assert_eq!(config.badge_dir, Some(PathBuf::from("/tmp/badges")));
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let config = StudioConfig {
            canvas_size: 0,
            ..StudioConfig::default()
        };
        assert!(config.validate().is_err());

        let config = StudioConfig {
            product_size_ratio: 1.5,
            ..StudioConfig::default()
        };
        assert!(config.validate().is_err());

        let config = StudioConfig {
            badge_opacity: -0.1,
            ..StudioConfig::default()
        };
        assert!(config.validate().is_err());

        let config = StudioConfig {
            jpeg_quality: 101,
            ..StudioConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_builder_clamps_jpeg_quality() {
        let config = StudioConfig::builder().jpeg_quality(200).build().unwrap();
        assert_eq!(config.jpeg_quality, 100);
    }

    #[test]
    fn test_config_serde_round_trip() {
        let config = StudioConfig::builder()
            .canvas_size(2048)
            .model_path("/models/isnet.onnx")
            .build()
            .unwrap();

        let json = serde_json::to_string(&config).unwrap();
        let restored: StudioConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, restored);
    }
}
