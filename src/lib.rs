#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::uninlined_format_args)]

//! # productshot
//!
//! Product photo standardization for e-commerce listings. One linear
//! pipeline turns an arbitrary product photo into a fixed-layout listing
//! image:
//!
//! 1. **Loader** — fetches the input from a URL or local path and
//!    normalizes it to opaque RGB.
//! 2. **Segmenter** — separates subject from background, producing an alpha
//!    channel. Backed by a pure Rust ONNX session (`tract` feature) or an
//!    identity pass-through when no model is available.
//! 3. **Edge Trimmer** — shrinks the alpha mask inward with iterated 3x3
//!    erosion passes to remove segmentation fringe, then crops to content.
//! 4. **Compositor** — scales the subject to 85% of a 1024x1024 canvas,
//!    centers it, and optionally overlays a 40%-opacity grade badge.
//! 5. **Encoder** — flattens onto a solid background color and writes a
//!    quality-95 JPEG atomically.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use productshot::{ImageSource, ProductShotProcessor, StudioConfig};
//!
//! # fn example() -> productshot::Result<()> {
//! let processor = ProductShotProcessor::new(StudioConfig::default())?;
//! let source = ImageSource::parse("https://example.com/product.jpg");
//! processor.process(&source, "S", "listing.jpg")?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` (default): command-line interface and tracing subscriber setup
//! - `tract`: pure Rust ONNX segmentation backend; without it the pipeline
//!   silently degrades to keeping the full image opaque
//!
//! ## Library-Only Usage
//!
//! ```toml
//! [dependencies]
//! productshot = { version = "0.1", default-features = false }
//! ```

#[cfg(feature = "cli")]
pub mod cli;
pub mod compositor;
pub mod config;
pub mod encoder;
pub mod error;
pub mod loader;
pub mod processor;
pub mod segmentation;
pub mod trim;

// Public API exports
pub use compositor::{BadgeLibrary, Grade};
pub use config::{StudioConfig, StudioConfigBuilder};
pub use error::{ProductShotError, Result};
pub use loader::{ImageLoader, ImageSource};
pub use processor::ProductShotProcessor;
pub use segmentation::{create_segmenter, IdentitySegmenter, Segmenter};

#[cfg(feature = "tract")]
pub use segmentation::TractSegmenter;
