//! Product photo standardizer CLI
//!
//! Takes a product image (URL or local path), removes its background, trims
//! fringe pixels, composites it onto a standardized canvas with an optional
//! grade badge, and writes a quality-95 JPEG.

#[cfg(feature = "cli")]
fn main() -> std::process::ExitCode {
    productshot::cli::run()
}

#[cfg(not(feature = "cli"))]
fn main() {
    panic!("CLI feature not enabled. Please rebuild with --features cli");
}
