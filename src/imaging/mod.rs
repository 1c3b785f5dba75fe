//! Image processing in pure Rust.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader` (content-sniffed) |
//! | **Fit** | [`calculate_fit_dimensions`] (aspect-preserving box fit) |
//! | **Resample** | Lanczos3 via `DynamicImage::resize_exact` |
//! | **Encode** | JPEG at configured quality, PNG lossless |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: [`Quality`] and [`Bounds`]
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Processor**: [`ImageProcessor`], the open → resize → thumbnail → save flow

pub mod backend;
mod calculations;
mod params;
pub mod processor;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::calculate_fit_dimensions;
pub use params::{Bounds, Quality};
pub use processor::{ImageProcessor, OpenedImage, ProcessError, SavedImages};
pub use rust_backend::{RustBackend, canonical_extension, extension_for_format};
