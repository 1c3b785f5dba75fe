//! Display copy and thumbnail production.
//!
//! [`ImageProcessor::open`] decodes a picture into an [`OpenedImage`], which
//! owns the source pixels and up to two working copies:
//!
//! ```text
//! open(path) → resize(display bounds) → thumbnail(thumb bounds) → save(display, thumb)
//! ```
//!
//! Both working copies are resampled from the *original* pixels using the
//! original natural dimensions, so the thumbnail never inherits resampling
//! artifacts from the display copy. Nothing is written until [`OpenedImage::save`],
//! and the working copies die with the `OpenedImage`; the processor itself
//! keeps no per-picture state and can be shared across uploads.

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::calculations::calculate_fit_dimensions;
use super::params::{Bounds, Quality};
use super::rust_backend::RustBackend;
use image::DynamicImage;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ProcessError {
    /// The file is not a decodable raster image. Not transient.
    #[error("Not a supported image: {0}")]
    Decode(#[source] BackendError),
    #[error("Resize to {target} failed: {source}")]
    Resize {
        target: Dimensions,
        #[source]
        source: BackendError,
    },
    #[error("Could not write {}: {source}", path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: BackendError,
    },
}

/// Turns one decoded picture into a display copy and a thumbnail.
pub struct ImageProcessor<B = RustBackend> {
    backend: B,
    quality: Quality,
}

impl ImageProcessor<RustBackend> {
    pub fn with_quality(quality: Quality) -> Self {
        Self::new(RustBackend::new(), quality)
    }
}

impl<B: ImageBackend> ImageProcessor<B> {
    pub fn new(backend: B, quality: Quality) -> Self {
        Self { backend, quality }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Decode `path` and record its natural dimensions.
    pub fn open(&self, path: &Path) -> Result<OpenedImage<'_, B>, ProcessError> {
        let source = self.backend.decode(path).map_err(ProcessError::Decode)?;
        let dimensions = Dimensions::new(source.width(), source.height());
        debug!(path = %path.display(), %dimensions, "opened picture");

        Ok(OpenedImage {
            processor: self,
            source,
            dimensions,
            display: None,
            thumbnail: None,
        })
    }
}

/// A decoded picture and the working copies prepared from it.
pub struct OpenedImage<'p, B> {
    processor: &'p ImageProcessor<B>,
    source: DynamicImage,
    dimensions: Dimensions,
    display: Option<DynamicImage>,
    thumbnail: Option<DynamicImage>,
}

/// What [`OpenedImage::save`] actually wrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SavedImages {
    pub display: Option<Dimensions>,
    pub thumbnail: Option<Dimensions>,
}

impl<B: ImageBackend> OpenedImage<'_, B> {
    /// Natural dimensions of the decoded source.
    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// Prepare the display copy, fitted inside `bounds`.
    pub fn resize(mut self, bounds: Bounds) -> Result<Self, ProcessError> {
        self.display = Some(self.fit(bounds)?);
        Ok(self)
    }

    /// Prepare the thumbnail, fitted inside `bounds`.
    pub fn thumbnail(mut self, bounds: Bounds) -> Result<Self, ProcessError> {
        self.thumbnail = Some(self.fit(bounds)?);
        Ok(self)
    }

    fn fit(&self, bounds: Bounds) -> Result<DynamicImage, ProcessError> {
        let target = calculate_fit_dimensions(self.dimensions, bounds);
        debug!(source = %self.dimensions, %target, "resampling");
        self.processor
            .backend
            .resample(&self.source, target)
            .map_err(|source| ProcessError::Resize { target, source })
    }

    /// Write whichever working copies were prepared: display first, then thumbnail.
    ///
    /// A copy that was never prepared is skipped, so `thumb_path` is
    /// untouched when [`thumbnail`](Self::thumbnail) was not called.
    pub fn save(
        self,
        display_path: &Path,
        thumb_path: &Path,
    ) -> Result<SavedImages, ProcessError> {
        let quality = self.processor.quality;
        let write = |image: &DynamicImage, path: &Path| {
            self.processor
                .backend
                .encode(image, path, quality)
                .map_err(|source| ProcessError::Save {
                    path: path.to_path_buf(),
                    source,
                })
                .map(|()| Dimensions::new(image.width(), image.height()))
        };

        let display = self
            .display
            .as_ref()
            .map(|image| write(image, display_path))
            .transpose()?;
        let thumbnail = self
            .thumbnail
            .as_ref()
            .map(|image| write(image, thumb_path))
            .transpose()?;

        Ok(SavedImages { display, thumbnail })
    }
}
