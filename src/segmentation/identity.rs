//! Identity segmenter: the degraded path when no model backend is available

use super::Segmenter;
use crate::error::Result;
use image::{Rgba, RgbaImage};

/// Pass-through segmenter that treats every pixel as subject
///
/// The resulting alpha channel is 255 everywhere, so the downstream edge
/// trimmer has nothing meaningful to erode and effectively becomes a no-op
/// crop to the full image.
#[derive(Debug, Default)]
pub struct IdentitySegmenter;

impl IdentitySegmenter {
    /// Create a new identity segmenter
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Segmenter for IdentitySegmenter {
    fn segment(&self, image: &image::RgbImage) -> Result<RgbaImage> {
        let (width, height) = image.dimensions();
        let mut output = RgbaImage::new(width, height);
        for (x, y, pixel) in image.enumerate_pixels() {
            output.put_pixel(x, y, Rgba([pixel[0], pixel[1], pixel[2], 255]));
        }
        Ok(output)
    }

    fn name(&self) -> &'static str {
        "identity"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    #[test]
    fn test_identity_is_fully_opaque() {
        let input = RgbImage::from_pixel(3, 2, image::Rgb([255, 0, 255]));
        let output = IdentitySegmenter::new().segment(&input).unwrap();

        assert_eq!(output.dimensions(), (3, 2));
        for pixel in output.pixels() {
            assert_eq!(pixel.0, [255, 0, 255, 255]);
        }
    }

    #[test]
    fn test_identity_preserves_colors() {
        let mut input = RgbImage::new(2, 1);
        input.put_pixel(0, 0, image::Rgb([1, 2, 3]));
        input.put_pixel(1, 0, image::Rgb([4, 5, 6]));

        let output = IdentitySegmenter::new().segment(&input).unwrap();
        assert_eq!(output.get_pixel(0, 0).0, [1, 2, 3, 255]);
        assert_eq!(output.get_pixel(1, 0).0, [4, 5, 6, 255]);
    }
}
