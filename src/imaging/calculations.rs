//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

use super::backend::Dimensions;
use super::params::Bounds;

/// Calculate the largest size with the source's aspect ratio that fits in `bounds`.
///
/// The constraining side always touches the box, so sources smaller than the
/// box are scaled up. No letterboxing is added: the other side may stay below
/// its bound.
///
/// # Arguments
/// * `source` - Natural image dimensions
/// * `bounds` - Maximum box
///
/// # Returns
/// * Target dimensions, each rounded half-up and kept within `1..=bound`
///
/// # Examples
/// ```
/// # use gallery_ingest::imaging::{Bounds, Dimensions, calculate_fit_dimensions};
/// // 4:3 into 1000x800 → width-constrained
/// let d = calculate_fit_dimensions(Dimensions::new(1600, 1200), Bounds::new(1000, 800));
/// assert_eq!(d, Dimensions::new(1000, 750));
///
/// // 4:3 into 350x150 → height-constrained
/// let d = calculate_fit_dimensions(Dimensions::new(1600, 1200), Bounds::new(350, 150));
/// assert_eq!(d, Dimensions::new(200, 150));
/// ```
pub fn calculate_fit_dimensions(source: Dimensions, bounds: Bounds) -> Dimensions {
    let ratio = source.width as f64 / source.height as f64;
    let max_w = bounds.max_width as f64;
    let max_h = bounds.max_height as f64;

    let (w, h) = if max_w / max_h > ratio {
        // Box is wider than the image: height is the constraint
        (max_h * ratio, max_h)
    } else {
        // Box is taller (or same shape): width is the constraint
        (max_w, max_w / ratio)
    };

    Dimensions {
        width: round_side(w, bounds.max_width),
        height: round_side(h, bounds.max_height),
    }
}

/// Round half-up and keep the result within `1..=bound`.
///
/// `f64::round` rounds half away from zero, which is half-up for the
/// non-negative values seen here.
fn round_side(value: f64, bound: u32) -> u32 {
    (value.round() as u32).clamp(1, bound.max(1))
}
