//! Pipeline orchestration
//!
//! One linear pass: Loader -> Segmenter -> Edge Trimmer -> Compositor ->
//! Encoder. The processor owns the expensive state (HTTP client, segmentation
//! session, badge library) so it can be constructed once per process and
//! reused across invocations.

use crate::compositor::{self, BadgeLibrary, Grade};
use crate::config::StudioConfig;
use crate::encoder;
use crate::error::Result;
use crate::loader::{ImageLoader, ImageSource};
use crate::segmentation::{create_segmenter, Segmenter};
use crate::trim;
use image::{RgbImage, RgbaImage};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Product photo standardization pipeline
pub struct ProductShotProcessor {
    config: StudioConfig,
    loader: ImageLoader,
    segmenter: Box<dyn Segmenter>,
    badges: BadgeLibrary,
}

impl ProductShotProcessor {
    /// Create a processor, selecting the segmentation backend once
    ///
    /// # Errors
    /// - Invalid configuration
    /// - HTTP client initialization failures
    /// - Segmentation model loading failures (a missing capability degrades
    ///   instead of failing, see [`create_segmenter`])
    pub fn new(config: StudioConfig) -> Result<Self> {
        config.validate()?;
        let segmenter = create_segmenter(&config)?;
        Self::with_segmenter(config, segmenter)
    }

    /// Create a processor with an injected segmentation backend
    ///
    /// # Errors
    /// - Invalid configuration
    /// - HTTP client initialization failures
    pub fn with_segmenter(config: StudioConfig, segmenter: Box<dyn Segmenter>) -> Result<Self> {
        config.validate()?;
        let loader = ImageLoader::new()?;
        let badges = config
            .badge_dir
            .as_ref()
            .map_or_else(BadgeLibrary::default, BadgeLibrary::new);
        debug!(backend = segmenter.name(), "processor ready");
        Ok(Self {
            config,
            loader,
            segmenter,
            badges,
        })
    }

    /// The active configuration
    #[must_use]
    pub fn config(&self) -> &StudioConfig {
        &self.config
    }

    /// Name of the selected segmentation backend
    #[must_use]
    pub fn segmenter_name(&self) -> &'static str {
        self.segmenter.name()
    }

    /// Run the full pipeline for one input and write the standardized JPEG
    ///
    /// Returns the output path on success. The grade string is interpreted by
    /// its first character, case-insensitively; unrecognized grades simply
    /// produce no badge.
    ///
    /// # Errors
    /// Load, segmentation, compositing, and encoding failures are fatal; edge
    /// trimming degrades instead of failing.
    pub fn process<P: AsRef<Path>>(
        &self,
        source: &ImageSource,
        grade: &str,
        output_path: P,
    ) -> Result<PathBuf> {
        let output_path = output_path.as_ref();
        info!(input = %source, grade, output = %output_path.display(), "processing product photo");

        let raw = self.loader.load(source)?;
        let canvas = self.compose(&raw, Grade::parse(grade))?;
        let flat = encoder::flatten(&canvas, &self.config);
        encoder::write_jpeg(&flat, output_path, &self.config)?;

        info!(output = %output_path.display(), "product photo written");
        Ok(output_path.to_path_buf())
    }

    /// The in-memory pipeline: segment, trim, and compose onto the canvas
    ///
    /// Exposed separately from [`process`](Self::process) so embedders and
    /// tests can run the deterministic stages without file or network I/O.
    ///
    /// # Errors
    /// Segmentation and compositing failures propagate; trimming never fails.
    pub fn compose(&self, image: &RgbImage, grade: Option<Grade>) -> Result<RgbaImage> {
        let segmented = self.segmenter.segment(image)?;
        let trimmed = trim::trim_edges(&segmented, &self.config);
        compositor::compose(&trimmed, grade, &self.badges, &self.config)
    }
}
