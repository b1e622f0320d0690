//! Edge trimming ("3px cut")
//!
//! Imperfect segmentation leaves a halo of fringe pixels along the subject
//! boundary. This stage shrinks the opaque region inward with iterated 3x3
//! erosion passes on the alpha channel alone, then crops tightly to the
//! remaining content. The iteration count is deliberately applied as repeated
//! small-kernel passes: on non-convex masks this is not equivalent to a
//! single larger kernel.
//!
//! This stage never aborts the run. On any internal failure it falls back to
//! the input with full opacity and logs a diagnostic.

use crate::config::StudioConfig;
use crate::error::{ProductShotError, Result};
use image::{GrayImage, Luma, RgbaImage};
use tracing::{debug, warn};

/// Shrink the alpha mask inward and crop to the content bounding box
///
/// Color channels are untouched; only alpha shrinks. When the eroded mask is
/// entirely transparent the image is returned uncropped rather than producing
/// a zero-size crop.
///
/// On failure the original image is returned with every alpha set to 255 and
/// a diagnostic is logged; callers never see an error from this stage.
#[must_use]
pub fn trim_edges(image: &RgbaImage, config: &StudioConfig) -> RgbaImage {
    match trim_edges_inner(image, config) {
        Ok(trimmed) => trimmed,
        Err(e) => {
            warn!("edge trim failed, falling back to untrimmed image: {e}");
            eprintln!("edge trim failed, falling back to untrimmed image: {e}");
            force_opaque(image)
        },
    }
}

fn trim_edges_inner(image: &RgbaImage, config: &StudioConfig) -> Result<RgbaImage> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(ProductShotError::processing(format!(
            "degenerate image dimensions {width}x{height}"
        )));
    }

    let eroded_alpha = erode_alpha(
        &extract_alpha(image),
        config.erosion_radius,
        config.erosion_iterations,
    );

    let mut result = image.clone();
    for (x, y, pixel) in result.enumerate_pixels_mut() {
        pixel.0[3] = eroded_alpha.get_pixel(x, y).0[0];
    }

    match content_bounding_box(&eroded_alpha) {
        Some((left, top, box_width, box_height)) => {
            debug!(
                left,
                top,
                width = box_width,
                height = box_height,
                "cropping to content bounding box"
            );
            Ok(image::imageops::crop_imm(&result, left, top, box_width, box_height).to_image())
        },
        None => {
            debug!("mask fully transparent after erosion, keeping full image");
            Ok(result)
        },
    }
}

/// Copy the alpha channel into a grayscale plane
fn extract_alpha(image: &RgbaImage) -> GrayImage {
    let (width, height) = image.dimensions();
    let mut alpha = GrayImage::new(width, height);
    for (x, y, pixel) in image.enumerate_pixels() {
        alpha.put_pixel(x, y, Luma([pixel.0[3]]));
    }
    alpha
}

/// Iterated grayscale erosion with a square structuring element
///
/// Each pass assigns every pixel the minimum over its neighborhood.
/// Out-of-bounds neighbors never win the minimum, so a fully opaque mask is
/// not eaten at the image borders.
fn erode_alpha(alpha: &GrayImage, radius: u8, iterations: u32) -> GrayImage {
    let (width, height) = alpha.dimensions();
    let r = i32::from(radius);
    let mut current = alpha.clone();

    for _ in 0..iterations {
        let mut next = current.clone();
        for y in 0..height {
            for x in 0..width {
                let mut min_val = current.get_pixel(x, y)[0];
                for dy in -r..=r {
                    for dx in -r..=r {
                        let nx = x as i32 + dx;
                        let ny = y as i32 + dy;
                        if nx >= 0 && nx < width as i32 && ny >= 0 && ny < height as i32 {
                            min_val = min_val.min(current.get_pixel(nx as u32, ny as u32)[0]);
                        }
                    }
                }
                next.put_pixel(x, y, Luma([min_val]));
            }
        }
        current = next;
    }

    current
}

/// Bounding box `(left, top, width, height)` of all non-transparent pixels,
/// or `None` when the mask is entirely transparent
fn content_bounding_box(alpha: &GrayImage) -> Option<(u32, u32, u32, u32)> {
    let (width, height) = alpha.dimensions();
    let mut min_x = width;
    let mut min_y = height;
    let mut max_x = 0u32;
    let mut max_y = 0u32;
    let mut found = false;

    for (x, y, pixel) in alpha.enumerate_pixels() {
        if pixel.0[0] > 0 {
            found = true;
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
    }

    if found {
        Some((min_x, min_y, max_x - min_x + 1, max_y - min_y + 1))
    } else {
        None
    }
}

/// Fallback output: the input converted to full opacity
fn force_opaque(image: &RgbaImage) -> RgbaImage {
    let mut opaque = image.clone();
    for pixel in opaque.pixels_mut() {
        pixel.0[3] = 255;
    }
    opaque
}
