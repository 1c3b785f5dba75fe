//! Scoped tracking of files created during one upload.
//!
//! Every path the pipeline is about to create is registered with a
//! [`CreatedFiles`] guard *before* the write, so a half-written file is
//! covered too. The guard ends in one of three ways:
//!
//! - [`commit`](CreatedFiles::commit): the upload succeeded, files stay.
//! - [`rollback`](CreatedFiles::rollback): remove everything in reverse
//!   order and report what could not be removed.
//! - dropped without either (early return, panic, cancelled caller): same
//!   removal as `rollback`, with failures only logged.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// A file the rollback could not remove. It is now orphaned in the store.
#[derive(Error, Debug)]
#[error("Could not remove {}: {source}", path.display())]
pub struct CleanupWarning {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

#[derive(Debug, Default)]
pub struct CreatedFiles {
    paths: Vec<PathBuf>,
}

impl CreatedFiles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a path that is about to be created.
    pub fn track(&mut self, path: impl Into<PathBuf>) {
        self.paths.push(path.into());
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Keep every tracked file and disarm the guard.
    pub fn commit(mut self) -> Vec<PathBuf> {
        std::mem::take(&mut self.paths)
    }

    /// Remove every tracked file, newest first.
    ///
    /// Files that are already gone are fine. Any other removal failure is
    /// returned so the caller can report it next to the original error.
    pub fn rollback(mut self) -> Vec<CleanupWarning> {
        remove_all(std::mem::take(&mut self.paths))
    }
}

impl Drop for CreatedFiles {
    fn drop(&mut self) {
        if self.paths.is_empty() {
            return;
        }
        debug!(count = self.paths.len(), "guard dropped with uncommitted files");
        // Warnings are already logged by remove_all
        let _ = remove_all(std::mem::take(&mut self.paths));
    }
}

fn remove_all(paths: Vec<PathBuf>) -> Vec<CleanupWarning> {
    paths
        .into_iter()
        .rev()
        .filter_map(|path| {
            remove_one(&path)
                .err()
                .map(|source| CleanupWarning { path, source })
        })
        .collect()
}

fn remove_one(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Ok(()) => {
            debug!(path = %path.display(), "removed");
            Ok(())
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => {
            warn!(
                path = %path.display(),
                error = %err,
                "could not remove file during rollback; it is orphaned"
            );
            Err(err)
        }
    }
}
