//! Canvas compositing: subject placement and grade badge overlay
//!
//! The trimmed subject is scaled so its longer side equals
//! `floor(canvas_size * product_size_ratio)`, centered with integer-floor
//! offsets on a transparent square canvas, and optionally topped with a
//! semi-transparent grade badge in the top-right corner.

use crate::config::StudioConfig;
use crate::error::{ProductShotError, Result};
use image::{imageops, RgbaImage};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Recognized product condition grades, each with a badge asset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grade {
    S,
    A,
    B,
    V,
}

impl Grade {
    /// Parse a grade string into a badge key
    ///
    /// Only the first character matters, case-insensitively. Unrecognized
    /// grades (and empty strings) are accepted but map to no badge.
    #[must_use]
    pub fn parse(code: &str) -> Option<Self> {
        match code.chars().next()?.to_ascii_uppercase() {
            'S' => Some(Self::S),
            'A' => Some(Self::A),
            'B' => Some(Self::B),
            'V' => Some(Self::V),
            _ => None,
        }
    }

    /// File name of this grade's badge asset
    #[must_use]
    pub fn asset_file_name(self) -> &'static str {
        match self {
            Self::S => "sgrade.png",
            Self::A => "agrade.png",
            Self::B => "bgrade.png",
            Self::V => "vgrade.png",
        }
    }
}

/// Read-only set of grade badge assets on disk
pub struct BadgeLibrary {
    dir: PathBuf,
}

impl BadgeLibrary {
    /// Use badge assets from the given directory
    #[must_use]
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    /// Resolve the default asset directory relative to the running
    /// executable's install location
    #[must_use]
    pub fn default_dir() -> PathBuf {
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
            .map_or_else(|| PathBuf::from("assets/grades"), |dir| dir.join("assets/grades"))
    }

    /// Load the badge image for a grade
    ///
    /// A missing asset file is a warning, never an error: the run continues
    /// without a badge. Decoding failures on a file that *does* exist are
    /// fatal.
    ///
    /// # Errors
    /// Returns an image error when an existing asset file cannot be decoded.
    pub fn load(&self, grade: Grade) -> Result<Option<RgbaImage>> {
        let path = self.dir.join(grade.asset_file_name());
        if !path.exists() {
            warn!(badge = %path.display(), "badge icon not found, skipping badge");
            eprintln!("Warning: Badge icon not found at {}", path.display());
            return Ok(None);
        }
        let badge = image::open(&path)?.to_rgba8();
        Ok(Some(badge))
    }
}

impl Default for BadgeLibrary {
    fn default() -> Self {
        Self::new(Self::default_dir())
    }
}

/// Resize the subject so its longer side equals the configured bound
///
/// Scaling goes both ways: small subjects are upscaled, large ones
/// downscaled, so the limiting axis always lands exactly on
/// `floor(canvas_size * product_size_ratio)`. Aspect ratio is preserved
/// within one pixel of rounding.
///
/// # Errors
/// Returns a processing error for a zero-size subject.
pub fn fit_subject(subject: &RgbaImage, config: &StudioConfig) -> Result<RgbaImage> {
    let (width, height) = subject.dimensions();
    if width == 0 || height == 0 {
        return Err(ProductShotError::processing(
            "cannot fit a zero-size subject onto the canvas",
        ));
    }

    let bound = config.max_subject_side();
    let (new_width, new_height) = if width >= height {
        let scaled_height = ((u64::from(height) * u64::from(bound)) / u64::from(width)) as u32;
        (bound, scaled_height.max(1))
    } else {
        let scaled_width = ((u64::from(width) * u64::from(bound)) / u64::from(height)) as u32;
        (scaled_width.max(1), bound)
    };

    debug!(
        from_width = width,
        from_height = height,
        to_width = new_width,
        to_height = new_height,
        "fitting subject to canvas bound"
    );
    Ok(imageops::resize(
        subject,
        new_width,
        new_height,
        imageops::FilterType::Lanczos3,
    ))
}

/// Scale the badge to the configured width and multiply its alpha channel
/// by the badge opacity, truncating to integer
fn prepare_badge(badge: &RgbaImage, config: &StudioConfig) -> RgbaImage {
    let badge_width = (config.canvas_size as f32 * config.badge_width_ratio) as u32;
    let badge_height =
        ((u64::from(badge_width) * u64::from(badge.height())) / u64::from(badge.width())) as u32;

    let mut resized = imageops::resize(
        badge,
        badge_width.max(1),
        badge_height.max(1),
        imageops::FilterType::Lanczos3,
    );

    for pixel in resized.pixels_mut() {
        pixel.0[3] = (f32::from(pixel.0[3]) * config.badge_opacity) as u8;
    }
    resized
}

/// Place the trimmed subject and an optional badge onto a fresh canvas
///
/// The canvas starts fully transparent; the subject is centered with
/// integer-floor offsets; the badge, when present, is alpha-composited at
/// `(canvas_size - badge_width - margin, margin)`.
///
/// # Errors
/// - Zero-size subject
/// - Badge asset decoding failures
pub fn compose(
    subject: &RgbaImage,
    grade: Option<Grade>,
    badges: &BadgeLibrary,
    config: &StudioConfig,
) -> Result<RgbaImage> {
    let mut canvas = RgbaImage::new(config.canvas_size, config.canvas_size);

    let fitted = fit_subject(subject, config)?;
    let offset_x = i64::from((config.canvas_size - fitted.width()) / 2);
    let offset_y = i64::from((config.canvas_size - fitted.height()) / 2);
    imageops::overlay(&mut canvas, &fitted, offset_x, offset_y);

    if let Some(grade) = grade {
        if let Some(badge) = badges.load(grade)? {
            let badge = prepare_badge(&badge, config);
            let badge_x =
                i64::from(config.canvas_size) - i64::from(badge.width()) - i64::from(config.badge_margin);
            let badge_y = i64::from(config.badge_margin);
            debug!(x = badge_x, y = badge_y, ?grade, "compositing grade badge");
            imageops::overlay(&mut canvas, &badge, badge_x, badge_y);
        }
    }

    Ok(canvas)
}
