//! Pure Rust image processing backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG) | `image::ImageReader` with content sniffing |
//! | Resample | `image::DynamicImage::resize_exact` with `Lanczos3` filter |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` at the configured quality |
//! | Encode → PNG | `image::codecs::png::PngEncoder` (lossless) |

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::params::Quality;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageError, ImageFormat, ImageReader};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Upload formats: declared extension → decoder/encoder format.
///
/// Mirrors the upload form's MIME allow-list (`image/jpeg`, `image/png`).
const UPLOAD_FORMATS: &[(&str, ImageFormat)] = &[
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("png", ImageFormat::Png),
];

/// Normalize a file extension to the one used for stored files.
///
/// Returns `None` for anything outside the upload allow-list.
/// `"JPEG"` → `"jpg"`, `"png"` → `"png"`, `"gif"` → `None`.
pub fn canonical_extension(extension: &str) -> Option<&'static str> {
    UPLOAD_FORMATS
        .iter()
        .find(|(ext, _)| ext.eq_ignore_ascii_case(extension))
        .and_then(|(_, format)| extension_for_format(*format))
}

/// Stored-file extension for a sniffed image format, if uploads accept it.
pub fn extension_for_format(format: ImageFormat) -> Option<&'static str> {
    match format {
        ImageFormat::Jpeg => Some("jpg"),
        ImageFormat::Png => Some("png"),
        _ => None,
    }
}

fn output_format(path: &Path) -> Option<ImageFormat> {
    let ext = path.extension().and_then(|e| e.to_str())?;
    UPLOAD_FORMATS
        .iter()
        .find(|(candidate, _)| candidate.eq_ignore_ascii_case(ext))
        .map(|(_, format)| *format)
}

/// Pure Rust backend using the `image` crate.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn encode_failed(path: &Path, err: ImageError) -> BackendError {
    match err {
        ImageError::IoError(io) => BackendError::Io(io),
        other => BackendError::ProcessingFailed(format!(
            "Failed to encode {}: {}",
            path.display(),
            other
        )),
    }
}

/// Encode as baseline JPEG. JPEG carries no alpha, so the image is flattened to RGB8.
fn save_jpeg(
    img: &DynamicImage,
    path: &Path,
    quality: Quality,
) -> Result<(), BackendError> {
    let mut writer = BufWriter::new(File::create(path)?);
    let encoder = JpegEncoder::new_with_quality(&mut writer, quality.value() as u8);
    DynamicImage::ImageRgb8(img.to_rgb8())
        .write_with_encoder(encoder)
        .map_err(|e| encode_failed(path, e))?;
    writer.flush()?;
    Ok(())
}

fn save_png(img: &DynamicImage, path: &Path) -> Result<(), BackendError> {
    let mut writer = BufWriter::new(File::create(path)?);
    let encoder = PngEncoder::new(&mut writer);
    img.write_with_encoder(encoder)
        .map_err(|e| encode_failed(path, e))?;
    writer.flush()?;
    Ok(())
}

impl ImageBackend for RustBackend {
    fn decode(&self, path: &Path) -> Result<DynamicImage, BackendError> {
        // Sniff the content instead of trusting the extension: a PNG
        // uploaded as `.jpg` is still a valid picture.
        let img = ImageReader::open(path)?
            .with_guessed_format()?
            .decode()
            .map_err(|e| BackendError::Decode {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        if img.width() == 0 || img.height() == 0 {
            return Err(BackendError::Decode {
                path: path.to_path_buf(),
                reason: "image has no pixels".into(),
            });
        }
        Ok(img)
    }

    fn resample(
        &self,
        image: &DynamicImage,
        target: Dimensions,
    ) -> Result<DynamicImage, BackendError> {
        if target.width == 0 || target.height == 0 {
            return Err(BackendError::ProcessingFailed(format!(
                "Cannot resample to {target}"
            )));
        }
        Ok(image.resize_exact(target.width, target.height, FilterType::Lanczos3))
    }

    fn encode(
        &self,
        image: &DynamicImage,
        path: &Path,
        quality: Quality,
    ) -> Result<(), BackendError> {
        match output_format(path) {
            Some(ImageFormat::Jpeg) => save_jpeg(image, path, quality),
            Some(ImageFormat::Png) => save_png(image, path),
            _ => Err(BackendError::UnsupportedFormat(
                path.extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or("")
                    .to_lowercase(),
            )),
        }
    }
}
