//! Output flattening and JPEG encoding
//!
//! The composited canvas is flattened onto the solid background color using
//! its own alpha channel as the blend weight, then written as a quality-95
//! JPEG. The file is written to a temporary sibling and renamed into place,
//! so a failed run never leaves a partial output behind.

use crate::config::StudioConfig;
use crate::error::{ProductShotError, Result};
use image::codecs::jpeg::JpegEncoder;
use image::{imageops, RgbImage, Rgba, RgbaImage};
use std::path::Path;
use tracing::debug;

/// Flatten the RGBA canvas onto the configured background color
///
/// Full alpha-compositing semantics: fully transparent pixels become the
/// background color, fully opaque pixels keep the canvas color, and partial
/// alpha blends linearly. No alpha channel survives.
#[must_use]
pub fn flatten(canvas: &RgbaImage, config: &StudioConfig) -> RgbImage {
    let [r, g, b] = config.background_color;
    let mut backdrop =
        RgbaImage::from_pixel(canvas.width(), canvas.height(), Rgba([r, g, b, 255]));
    imageops::overlay(&mut backdrop, canvas, 0, 0);
    image::DynamicImage::ImageRgba8(backdrop).to_rgb8()
}

/// Encode the flattened image as JPEG and write it atomically
///
/// The JPEG is first written to a temporary file in the output path's
/// directory and then persisted over the final name, so the output is either
/// complete or absent.
///
/// # Errors
/// - Output directory missing or unwritable
/// - Encoding failures
/// - Rename failures (cross-device targets, permissions)
pub fn write_jpeg<P: AsRef<Path>>(image: &RgbImage, path: P, config: &StudioConfig) -> Result<()> {
    let path = path.as_ref();
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty());

    let mut tmp = match dir {
        Some(dir) => tempfile::NamedTempFile::new_in(dir),
        None => tempfile::NamedTempFile::new_in("."),
    }
    .map_err(|e| ProductShotError::file_io_error("create temporary file near", path, e))?;

    let encoder = JpegEncoder::new_with_quality(tmp.as_file_mut(), config.jpeg_quality);
    image.write_with_encoder(encoder)?;

    tmp.persist(path)
        .map_err(|e| ProductShotError::file_io_error("persist output to", path, e.error))?;
    debug!(output = %path.display(), "JPEG written");
    Ok(())
}
