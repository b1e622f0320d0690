//! Tract segmentation backend
//!
//! Runs an ONNX saliency model (`ISNet`-style: `1x3xNxN` input, `1x1xNxN`
//! output) through Tract, a pure Rust inference engine with no external
//! dependencies.
//! The model is loaded once at construction and the session is reused for
//! every subsequent call.

use super::Segmenter;
use crate::error::{ProductShotError, Result};
use image::{imageops, ImageBuffer, Rgb, RgbImage, Rgba, RgbaImage};
use ndarray::Array4;
use std::path::Path;
use tract_onnx::prelude::*;
use tracing::{debug, info};

/// Type alias for the optimized runnable Tract model
type TractModel = RunnableModel<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// Square edge length the model expects its input resized to
const MODEL_INPUT_SIZE: u32 = 1024;

/// Normalization applied per channel: `(value / 255 - MEAN) / STD`
const NORM_MEAN: f32 = 0.5;
const NORM_STD: f32 = 1.0;

/// Mapping between original image coordinates and model tensor coordinates
struct CoordinateTransform {
    scale: f32,
    offset_x: u32,
    offset_y: u32,
    mask_width: u32,
    mask_height: u32,
}

/// ONNX saliency segmenter backed by Tract
pub struct TractSegmenter {
    model: TractModel,
}

impl TractSegmenter {
    /// Load and optimize the ONNX model at the given path
    ///
    /// This is the expensive one-time setup; the resulting session is
    /// reusable and read-only.
    ///
    /// # Errors
    /// Returns [`ProductShotError::Segmentation`] when the model file cannot
    /// be parsed, optimized, or made runnable.
    pub fn from_model_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!(model = %path.display(), "loading segmentation model");

        let model = onnx()
            .model_for_path(path)
            .map_err(|e| {
                ProductShotError::segmentation(format!("failed to load ONNX model: {e}"))
            })?
            .into_optimized()
            .map_err(|e| {
                ProductShotError::segmentation(format!("failed to optimize model: {e}"))
            })?
            .into_runnable()
            .map_err(|e| {
                ProductShotError::segmentation(format!("failed to create runnable model: {e}"))
            })?;

        Ok(Self { model })
    }

    /// Resize with preserved aspect ratio, center on a square canvas, and
    /// normalize into an NCHW f32 tensor
    fn preprocess(image: &RgbImage) -> (Array4<f32>, CoordinateTransform) {
        let (orig_width, orig_height) = image.dimensions();
        let target = MODEL_INPUT_SIZE as f32;

        let scale = (target / orig_width as f32).min(target / orig_height as f32);
        let new_width = ((orig_width as f32 * scale).round() as u32).max(1);
        let new_height = ((orig_height as f32 * scale).round() as u32).max(1);

        let resized = imageops::resize(image, new_width, new_height, imageops::FilterType::Triangle);

        let offset_x = (MODEL_INPUT_SIZE - new_width) / 2;
        let offset_y = (MODEL_INPUT_SIZE - new_height) / 2;

        // White padding around the centered subject
        let mut canvas: ImageBuffer<Rgb<u8>, Vec<u8>> =
            ImageBuffer::from_pixel(MODEL_INPUT_SIZE, MODEL_INPUT_SIZE, Rgb([255, 255, 255]));
        for (x, y, pixel) in resized.enumerate_pixels() {
            let cx = x + offset_x;
            let cy = y + offset_y;
            if cx < MODEL_INPUT_SIZE && cy < MODEL_INPUT_SIZE {
                canvas.put_pixel(cx, cy, *pixel);
            }
        }

        let size = MODEL_INPUT_SIZE as usize;
        let mut tensor = Array4::<f32>::zeros((1, 3, size, size));
        for (x, y, pixel) in canvas.enumerate_pixels() {
            for channel in 0..3 {
                tensor[[0, channel, y as usize, x as usize]] =
                    (f32::from(pixel[channel]) / 255.0 - NORM_MEAN) / NORM_STD;
            }
        }

        let transform = CoordinateTransform {
            scale,
            offset_x,
            offset_y,
            mask_width: MODEL_INPUT_SIZE,
            mask_height: MODEL_INPUT_SIZE,
        };
        (tensor, transform)
    }

    /// Run the model on the preprocessed tensor
    fn infer(&self, input: &Array4<f32>) -> Result<Array4<f32>> {
        let input_tensor = Tensor::from(input.clone());

        let outputs = self.model.run(tvec![input_tensor.into()]).map_err(|e| {
            ProductShotError::segmentation(format!("inference failed: {e}"))
        })?;

        let output_tensor = outputs
            .into_iter()
            .next()
            .ok_or_else(|| ProductShotError::segmentation("no output tensor produced"))?
            .into_arc_tensor();

        let output_view = output_tensor.to_array_view::<f32>().map_err(|e| {
            ProductShotError::segmentation(format!("failed to read output tensor: {e}"))
        })?;

        let shape = output_view.shape();
        if shape.len() != 4 || shape[0] != 1 || shape[1] != 1 {
            return Err(ProductShotError::segmentation(format!(
                "expected 1x1xHxW output tensor, got {shape:?}"
            )));
        }

        let (height, width) = (shape[2], shape[3]);
        Array4::from_shape_vec(
            (1, 1, height, width),
            output_view.iter().copied().collect(),
        )
        .map_err(|e| ProductShotError::segmentation(format!("failed to reshape output: {e}")))
    }

    /// Sample the model output at the tensor coordinate corresponding to an
    /// original image coordinate
    fn mask_value_at(tensor: &Array4<f32>, x: u32, y: u32, transform: &CoordinateTransform) -> f32 {
        let scaled_x = (x as f32 * transform.scale).round() as u32;
        let scaled_y = (y as f32 * transform.scale).round() as u32;
        let tensor_x = scaled_x + transform.offset_x;
        let tensor_y = scaled_y + transform.offset_y;

        if tensor_x < transform.mask_width && tensor_y < transform.mask_height {
            tensor
                .get([0, 0, tensor_y as usize, tensor_x as usize])
                .copied()
                .unwrap_or(0.0)
        } else {
            // Outside the model's prediction area
            0.0
        }
    }

    /// Map the model output back to an alpha channel at the original
    /// resolution and apply it to the input colors
    fn apply_mask(
        image: &RgbImage,
        tensor: &Array4<f32>,
        transform: &CoordinateTransform,
    ) -> RgbaImage {
        let (width, height) = image.dimensions();
        let mut output = RgbaImage::new(width, height);
        for (x, y, pixel) in image.enumerate_pixels() {
            let value = Self::mask_value_at(tensor, x, y, transform);
            let alpha = (value.clamp(0.0, 1.0) * 255.0) as u8;
            output.put_pixel(x, y, Rgba([pixel[0], pixel[1], pixel[2], alpha]));
        }
        output
    }
}

impl Segmenter for TractSegmenter {
    fn segment(&self, image: &RgbImage) -> Result<RgbaImage> {
        debug!(
            width = image.width(),
            height = image.height(),
            "running tract segmentation"
        );
        let (tensor, transform) = Self::preprocess(image);
        let output = self.infer(&tensor)?;
        Ok(Self::apply_mask(image, &output, &transform))
    }

    fn name(&self) -> &'static str {
        "tract"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preprocess_shapes_and_centering() {
        let image = RgbImage::from_pixel(512, 256, Rgb([0, 0, 0]));
        let (tensor, transform) = TractSegmenter::preprocess(&image);

        assert_eq!(tensor.shape(), &[1, 3, 1024, 1024]);
        // Longer side maps to the full model input
        assert!((transform.scale - 2.0).abs() < f32::EPSILON);
        assert_eq!(transform.offset_x, 0);
        assert_eq!(transform.offset_y, 256);
    }

    #[test]
    fn test_preprocess_normalization_range() {
        let image = RgbImage::from_pixel(8, 8, Rgb([255, 0, 128]));
        let (tensor, _) = TractSegmenter::preprocess(&image);

        // (255/255 - 0.5) / 1.0 = 0.5 at the padded border and red channel
        assert!(tensor.iter().all(|value| (-0.5..=0.5).contains(value)));
    }

    #[test]
    fn test_mask_application_clamps() {
        let image = RgbImage::from_pixel(2, 2, Rgb([9, 9, 9]));
        let transform = CoordinateTransform {
            scale: 1.0,
            offset_x: 0,
            offset_y: 0,
            mask_width: 2,
            mask_height: 2,
        };
        let mut tensor = Array4::<f32>::zeros((1, 1, 2, 2));
        tensor[[0, 0, 0, 0]] = 2.0; // over-range, clamps to opaque
        tensor[[0, 0, 0, 1]] = -1.0; // under-range, clamps to transparent
        tensor[[0, 0, 1, 0]] = 0.5;

        let output = TractSegmenter::apply_mask(&image, &tensor, &transform);
        assert_eq!(output.get_pixel(0, 0).0[3], 255);
        assert_eq!(output.get_pixel(1, 0).0[3], 0);
        assert_eq!(output.get_pixel(0, 1).0[3], 127);
    }
}
