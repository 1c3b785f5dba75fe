//! The upload orchestrator.
//!
//! [`Uploader::upload`] runs one picture through the whole pipeline:
//!
//! ```text
//! Idle → Named → Moved → Processed(display) → Processed(thumb) → Saved
//!          │        └──────────────┬──────────────────┘
//!          │                 any failure
//!          ▼                       ▼
//!   Err(NamingError)     RollingBack → Failed
//! ```
//!
//! Naming happens before anything touches the disk, so a naming failure is
//! returned as an error and leaves nothing to clean up. From the move onward
//! every created path is tracked by a [`CreatedFiles`] guard; on failure the
//! guard removes them and the call returns an [`UploadOutcome`] with
//! `failed = true`. Either both the display file and the thumbnail exist, or
//! neither does.
//!
//! Nothing is retried. Calling `upload` again draws a fresh token, so a new
//! attempt never collides with the names of a failed one.

use crate::config::IngestConfig;
use crate::imaging::{
    Bounds, ImageBackend, ImageProcessor, ProcessError, RustBackend, SavedImages,
};
use crate::incoming::IncomingFile;
use crate::naming::{NameSet, Namer, NamingError, TokenSource, UuidTokens};
use crate::rollback::{CleanupWarning, CreatedFiles};
use crate::store::{PictureStore, StoreError};
use crate::types::PictureRecord;
use chrono::Utc;
use serde::Serialize;
use std::io;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, error, info};

/// Why an upload failed after naming.
#[derive(Error, Debug)]
pub enum UploadError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("{} already exists in the store", path.display())]
    NameTaken { path: PathBuf },
    #[error("Could not move {} into the store: {source}", from.display())]
    Move {
        from: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Process(#[from] ProcessError),
}

/// Diagnostic kept with a failed outcome. Not meant for end users.
#[derive(Debug)]
pub struct UploadFailure {
    pub error: UploadError,
    /// Files the rollback could not remove.
    pub cleanup: Vec<CleanupWarning>,
}

/// Result of one upload attempt.
///
/// The names are filled in even when `failed` is true (useful in logs), but
/// only a successful outcome may be persisted.
#[derive(Debug, Serialize)]
pub struct UploadOutcome {
    pub stored_file_name: String,
    pub thumb_file_name: String,
    pub slug_name: String,
    pub failed: bool,
    #[serde(skip)]
    pub failure: Option<UploadFailure>,
}

impl UploadOutcome {
    fn succeeded(names: NameSet) -> Self {
        Self {
            stored_file_name: names.stored_file_name,
            thumb_file_name: names.thumb_file_name,
            slug_name: names.slug_name,
            failed: false,
            failure: None,
        }
    }

    fn failed(names: NameSet, failure: UploadFailure) -> Self {
        Self {
            stored_file_name: names.stored_file_name,
            thumb_file_name: names.thumb_file_name,
            slug_name: names.slug_name,
            failed: true,
            failure: Some(failure),
        }
    }

    /// The record to persist for this upload, stamped now.
    ///
    /// `None` when the upload failed.
    pub fn record(&self, name: &str) -> Option<PictureRecord> {
        if self.failed {
            return None;
        }
        Some(PictureRecord {
            name: name.to_string(),
            picture_filename: self.stored_file_name.clone(),
            thumb_filename: self.thumb_file_name.clone(),
            slug_name: self.slug_name.clone(),
            added_at: Utc::now(),
            tag: None,
            description: None,
        })
    }
}

pub struct Uploader<B = RustBackend, T = UuidTokens> {
    store: PictureStore,
    namer: Namer<T>,
    processor: ImageProcessor<B>,
    display: Bounds,
    thumbnail: Bounds,
}

impl Uploader<RustBackend, UuidTokens> {
    /// Production uploader: `image`-crate backend, UUID v7 tokens.
    pub fn from_config(config: &IngestConfig) -> Self {
        Self::new(
            PictureStore::new(&config.target_dir),
            Namer::new(UuidTokens),
            ImageProcessor::with_quality(config.quality()),
            config.display,
            config.thumbnail,
        )
    }
}

impl<B: ImageBackend, T: TokenSource> Uploader<B, T> {
    pub fn new(
        store: PictureStore,
        namer: Namer<T>,
        processor: ImageProcessor<B>,
        display: Bounds,
        thumbnail: Bounds,
    ) -> Self {
        Self {
            store,
            namer,
            processor,
            display,
            thumbnail,
        }
    }

    pub fn store(&self) -> &PictureStore {
        &self.store
    }

    /// Ingest one uploaded picture.
    ///
    /// Returns `Err` only for naming problems, which the caller must fix
    /// before trying again. Every later failure is rolled back and reported
    /// as an outcome with `failed = true`.
    pub fn upload(
        &self,
        file: &IncomingFile,
        display_name: &str,
    ) -> Result<UploadOutcome, NamingError> {
        let names = self
            .namer
            .name(file.original_name(), display_name, file.guess_extension())?;
        debug!(
            original = file.original_name(),
            stored = %names.stored_file_name,
            slug = %names.slug_name,
            "named upload"
        );

        let mut created = CreatedFiles::new();
        match self.ingest(file, &names, &mut created) {
            Ok(saved) => {
                created.commit();
                info!(
                    stored = %names.stored_file_name,
                    thumb = %names.thumb_file_name,
                    display = ?saved.display,
                    thumbnail = ?saved.thumbnail,
                    "picture uploaded"
                );
                Ok(UploadOutcome::succeeded(names))
            }
            Err(err) => {
                error!(
                    original = file.original_name(),
                    stored = %names.stored_file_name,
                    error = %err,
                    "upload failed, rolling back"
                );
                let cleanup = created.rollback();
                Ok(UploadOutcome::failed(
                    names,
                    UploadFailure {
                        error: err,
                        cleanup,
                    },
                ))
            }
        }
    }

    fn ingest(
        &self,
        file: &IncomingFile,
        names: &NameSet,
        created: &mut CreatedFiles,
    ) -> Result<SavedImages, UploadError> {
        let display_path = self.store.path_for(&names.stored_file_name)?;
        let thumb_path = self.store.path_for(&names.thumb_file_name)?;
        self.store.ensure_exists()?;

        // Never track (and so never roll back) a file this call did not create
        for path in [&display_path, &thumb_path] {
            if path.exists() {
                return Err(UploadError::NameTaken { path: path.clone() });
            }
        }

        created.track(&display_path);
        file.place(&display_path).map_err(|source| UploadError::Move {
            from: file.path().to_path_buf(),
            source,
        })?;
        debug!(path = %display_path.display(), "moved into store");

        let prepared = self
            .processor
            .open(&display_path)?
            .resize(self.display)?
            .thumbnail(self.thumbnail)?;

        created.track(&thumb_path);
        Ok(prepared.save(&display_path, &thumb_path)?)
    }
}
