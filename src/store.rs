//! The picture store: one flat directory of display files and thumbnails.
//!
//! The store is only ever written additively by uploads (fresh names every
//! time). Removal belongs to whoever owns the picture records: when a record
//! is deleted, its two files go first, then the record.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Invalid stored file name: {0:?}")]
    InvalidName(String),
}

#[derive(Debug, Clone)]
pub struct PictureStore {
    root: PathBuf,
}

impl PictureStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the store directory if needed.
    pub fn ensure_exists(&self) -> Result<(), StoreError> {
        fs::create_dir_all(&self.root).map_err(|source| StoreError::Io {
            path: self.root.clone(),
            source,
        })
    }

    /// Absolute location of a stored file.
    ///
    /// Only plain file names are accepted, so a name coming back from a
    /// record can never point outside the store.
    pub fn path_for(&self, file_name: &str) -> Result<PathBuf, StoreError> {
        let plain = !file_name.is_empty()
            && file_name != "."
            && file_name != ".."
            && !file_name.contains(['/', '\\', '\0']);
        if !plain {
            return Err(StoreError::InvalidName(file_name.to_string()));
        }
        Ok(self.root.join(file_name))
    }

    pub fn contains(&self, file_name: &str) -> bool {
        self.path_for(file_name).is_ok_and(|p| p.is_file())
    }

    /// Remove a stored picture's display file and thumbnail.
    ///
    /// Files that are already gone count as removed. Both names are checked
    /// before anything is deleted.
    pub fn remove_picture(
        &self,
        stored_file_name: &str,
        thumb_file_name: &str,
    ) -> Result<(), StoreError> {
        let paths = [
            self.path_for(stored_file_name)?,
            self.path_for(thumb_file_name)?,
        ];
        for path in paths {
            match fs::remove_file(&path) {
                Ok(()) => debug!(path = %path.display(), "removed"),
                Err(source) if source.kind() == io::ErrorKind::NotFound => {
                    debug!(path = %path.display(), "already gone");
                }
                Err(source) => return Err(StoreError::Io { path, source }),
            }
        }
        info!(
            stored = stored_file_name,
            thumb = thumb_file_name,
            "picture files removed"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::write_text_file;
    use tempfile::TempDir;

    #[test]
    fn ensure_exists_creates_nested_directories() {
        let tmp = TempDir::new().unwrap();
        let store = PictureStore::new(tmp.path().join("public/uploads/pictures"));

        store.ensure_exists().unwrap();
        assert!(store.root().is_dir());
        // Idempotent
        store.ensure_exists().unwrap();
    }

    #[test]
    fn path_for_joins_plain_names() {
        let store = PictureStore::new("/srv/pictures");
        assert_eq!(
            store.path_for("sunset-abc.jpg").unwrap(),
            PathBuf::from("/srv/pictures/sunset-abc.jpg")
        );
    }

    #[test]
    fn path_for_rejects_traversal_and_separators() {
        let store = PictureStore::new("/srv/pictures");
        for bad in ["", ".", "..", "../etc/passwd", "a/b.jpg", r"a\b.jpg", "a\0.jpg"] {
            assert!(
                matches!(store.path_for(bad), Err(StoreError::InvalidName(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn remove_picture_removes_both_files() {
        let tmp = TempDir::new().unwrap();
        let store = PictureStore::new(tmp.path());
        write_text_file(&tmp.path().join("a.jpg"), "a");
        write_text_file(&tmp.path().join("a-thumb.jpg"), "t");
        write_text_file(&tmp.path().join("b.jpg"), "b");

        store.remove_picture("a.jpg", "a-thumb.jpg").unwrap();

        assert!(!store.contains("a.jpg"));
        assert!(!store.contains("a-thumb.jpg"));
        assert!(store.contains("b.jpg"));
    }

    #[test]
    fn remove_picture_tolerates_missing_files() {
        let tmp = TempDir::new().unwrap();
        let store = PictureStore::new(tmp.path());
        write_text_file(&tmp.path().join("a.jpg"), "a");

        store.remove_picture("a.jpg", "a-thumb.jpg").unwrap();
        assert!(!store.contains("a.jpg"));
    }

    #[test]
    fn remove_picture_validates_before_deleting() {
        let tmp = TempDir::new().unwrap();
        let store = PictureStore::new(tmp.path());
        write_text_file(&tmp.path().join("a.jpg"), "a");

        let err = store.remove_picture("a.jpg", "../a-thumb.jpg").unwrap_err();

        assert!(matches!(err, StoreError::InvalidName(_)));
        assert!(store.contains("a.jpg"));
    }
}
