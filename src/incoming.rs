//! The uploaded-file handle.
//!
//! An [`IncomingFile`] is what the web layer hands over after receiving an
//! upload: where the bytes landed, the filename the client sent, and whether
//! the bytes may be moved or must be copied into the store.

use crate::imaging::{canonical_extension, extension_for_format};
use crate::naming::declared_extension;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Enough leading bytes for `image::guess_format` to recognize JPEG and PNG.
const SNIFF_LEN: u64 = 16;

/// How the received bytes reach the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transfer {
    /// Rename into place, falling back to copy + remove across filesystems.
    #[default]
    Move,
    /// Copy into place and leave the source alone.
    Copy,
}

#[derive(Debug, Clone)]
pub struct IncomingFile {
    path: PathBuf,
    original_name: String,
    transfer: Transfer,
}

impl IncomingFile {
    /// A received file at `path` that the client called `original_name`.
    pub fn new(path: impl Into<PathBuf>, original_name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            original_name: original_name.into(),
            transfer: Transfer::Move,
        }
    }

    /// A local file uploaded under its own name.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let original_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::new(path, original_name)
    }

    /// Copy instead of move, so the source survives the upload.
    pub fn keep_source(mut self) -> Self {
        self.transfer = Transfer::Copy;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn original_name(&self) -> &str {
        &self.original_name
    }

    pub fn transfer(&self) -> Transfer {
        self.transfer
    }

    /// Guess the stored-file extension.
    ///
    /// Content wins over the declared name: a PNG called `photo.jpg` gets
    /// `png`. Only when the content is not a recognized image does the
    /// client's extension decide, and only if it is an accepted format.
    pub fn guess_extension(&self) -> Option<&'static str> {
        self.sniff_extension().or_else(|| {
            declared_extension(&self.original_name).and_then(canonical_extension)
        })
    }

    fn sniff_extension(&self) -> Option<&'static str> {
        let mut header = Vec::with_capacity(SNIFF_LEN as usize);
        File::open(&self.path)
            .and_then(|f| f.take(SNIFF_LEN).read_to_end(&mut header))
            .ok()?;
        let format = image::guess_format(&header).ok()?;
        extension_for_format(format)
    }

    /// Put the received bytes at `destination`.
    ///
    /// Fails with `AlreadyExists` rather than replacing an existing file, and
    /// with `InvalidInput` when the source is not a regular file. Nothing is
    /// moved in either case.
    pub fn place(&self, destination: &Path) -> io::Result<()> {
        if !fs::symlink_metadata(&self.path)?.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a regular file", self.path.display()),
            ));
        }
        if destination.try_exists()? {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("{} already exists", destination.display()),
            ));
        }

        match self.transfer {
            Transfer::Copy => {
                fs::copy(&self.path, destination)?;
            }
            Transfer::Move => {
                if let Err(err) = fs::rename(&self.path, destination) {
                    debug!(
                        from = %self.path.display(),
                        to = %destination.display(),
                        error = %err,
                        "rename failed, copying instead"
                    );
                    fs::copy(&self.path, destination)?;
                    fs::remove_file(&self.path)?;
                }
            }
        }
        Ok(())
    }
}
