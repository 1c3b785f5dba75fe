//! Parameter types for image operations.
//!
//! These describe *what* to produce, not *how*. The
//! [`processor`](super::processor) turns them into concrete target sizes and
//! hands the pixel work to a [`backend`](super::backend).
//!
//! ## Types
//!
//! - [`Quality`]: Lossy encoding quality (1–100, default 90). Clamped on construction.
//! - [`Bounds`]: Maximum box an output image must fit in (display or thumbnail).

use serde::{Deserialize, Serialize};

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

/// Maximum width and height an output image may occupy.
///
/// Both sides must be non-zero; [`IngestConfig::validate`](crate::config::IngestConfig::validate)
/// rejects configs that say otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Bounds {
    pub max_width: u32,
    pub max_height: u32,
}

impl Bounds {
    pub const fn new(max_width: u32, max_height: u32) -> Self {
        Self {
            max_width,
            max_height,
        }
    }

    /// Box for the picture shown on the detail page.
    pub const DISPLAY: Bounds = Bounds::new(1000, 800);

    /// Box for the preview shown on the gallery index.
    pub const THUMBNAIL: Bounds = Bounds::new(350, 150);

    pub fn is_empty(self) -> bool {
        self.max_width == 0 || self.max_height == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_clamps_to_valid_range() {
        assert_eq!(Quality::new(0).value(), 1);
        assert_eq!(Quality::new(50).value(), 50);
        assert_eq!(Quality::new(150).value(), 100);
    }

    #[test]
    fn quality_default_is_90() {
        assert_eq!(Quality::default().value(), 90);
    }

    #[test]
    fn stock_bounds() {
        assert_eq!(Bounds::DISPLAY, Bounds::new(1000, 800));
        assert_eq!(Bounds::THUMBNAIL, Bounds::new(350, 150));
    }

    #[test]
    fn zero_side_is_empty() {
        assert!(Bounds::new(0, 10).is_empty());
        assert!(Bounds::new(10, 0).is_empty());
        assert!(!Bounds::new(1, 1).is_empty());
    }
}
