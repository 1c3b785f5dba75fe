//! Shared test utilities for the gallery-ingest test suite.
//!
//! Fixture writers for real JPEG/PNG files, deterministic token sources for
//! the namer, and a few assertions about slugs and store contents.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! create_test_jpeg(&tmp.path().join("in.jpg"), 1600, 1200);
//!
//! let namer = Namer::new(FixedToken("tok".into()));
//! let names = namer.name("Sunset.jpg", "My Sunset", Some("jpg")).unwrap();
//! assert_slug(&names.slug_name);
//! ```

use image::{ImageEncoder, ImageFormat, RgbImage};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::naming::TokenSource;

// =========================================================================
// Fixture files
// =========================================================================

fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    })
}

/// Create a small valid JPEG file with the given dimensions.
pub fn create_test_jpeg(path: &Path, width: u32, height: u32) {
    let img = gradient(width, height);
    let file = std::fs::File::create(path).unwrap();
    let writer = std::io::BufWriter::new(file);
    image::codecs::jpeg::JpegEncoder::new(writer)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
}

/// Create a small valid PNG file with the given dimensions.
pub fn create_test_png(path: &Path, width: u32, height: u32) {
    gradient(width, height)
        .save_with_format(path, ImageFormat::Png)
        .unwrap();
}

pub fn write_text_file(path: &Path, content: &str) {
    std::fs::write(path, content).unwrap();
}

/// Sorted file names in a store directory. Empty if the directory is missing.
pub fn store_entries(dir: &Path) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

// =========================================================================
// Token sources
// =========================================================================

/// Always hands out the same token.
pub struct FixedToken(pub String);

impl TokenSource for FixedToken {
    fn next_token(&self) -> String {
        self.0.clone()
    }
}

/// Hands out `t0`, `t1`, `t2`, ...
#[derive(Default)]
pub struct SequenceTokens {
    next: AtomicUsize,
}

impl TokenSource for SequenceTokens {
    fn next_token(&self) -> String {
        format!("t{}", self.next.fetch_add(1, Ordering::Relaxed))
    }
}

// =========================================================================
// Assertions
// =========================================================================

/// Assert `s` is a non-empty slug: `a-z`/`0-9` words joined by single hyphens.
pub fn assert_slug(s: &str) {
    assert!(!s.is_empty(), "slug is empty");
    assert!(
        s.split('-')
            .all(|word| !word.is_empty()
                && word.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())),
        "not a slug: {s:?}"
    );
}
