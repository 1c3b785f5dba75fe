//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the three operations every backend must
//! support: decode, resample, and encode. The
//! [`ImageProcessor`](super::processor::ImageProcessor) decides *what* to
//! produce; the backend does the pixel work.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate.

use super::params::Quality;
use image::DynamicImage;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to decode {}: {reason}", path.display())]
    Decode { path: PathBuf, reason: String },
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Width and height of an image, both non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Trait for image processing backends.
///
/// Implementations hold no per-image state, so one backend can serve any
/// number of uploads.
pub trait ImageBackend: Sync {
    /// Decode a raster image from disk.
    fn decode(&self, path: &Path) -> Result<DynamicImage, BackendError>;

    /// Produce a new image scaled to exactly `target`.
    fn resample(
        &self,
        image: &DynamicImage,
        target: Dimensions,
    ) -> Result<DynamicImage, BackendError>;

    /// Encode `image` to `path`, choosing the format from the path's extension.
    fn encode(
        &self,
        image: &DynamicImage,
        path: &Path,
        quality: Quality,
    ) -> Result<(), BackendError>;
}
