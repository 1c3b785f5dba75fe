//! # Gallery Ingest
//!
//! The picture ingestion pipeline of a photo gallery. One call takes a
//! freshly uploaded image and leaves exactly two files in the picture store,
//! a display copy and a thumbnail, under collision-free names, together with
//! a URL slug for the picture's page.
//!
//! # Pipeline
//!
//! ```text
//! 1. Name      original filename + display name + token  →  NameSet
//! 2. Move      received bytes  →  store/<stored_file_name>
//! 3. Process   decode → fit display box → fit thumbnail box
//! 4. Save      display copy over the moved file, thumbnail beside it
//! ```
//!
//! Any failure after naming removes every file the call created, so the
//! store never holds a picture without its thumbnail. See [`upload`] for the
//! state machine and [`rollback`] for the cleanup guard.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`naming`] | Slugging, tokens, and the stored/thumbnail/slug name triple |
//! | [`imaging`] | Fit calculation, `image`-crate backend, display + thumbnail processor |
//! | [`incoming`] | The received file: format sniffing and move/copy into the store |
//! | [`upload`] | The orchestrator: runs the steps, folds failures into the outcome |
//! | [`rollback`] | Drop guard that removes created files unless committed |
//! | [`store`] | The target directory: safe path resolution and picture removal |
//! | [`types`] | `PictureRecord`, what the caller persists after a successful upload |
//! | [`config`] | `gallery-ingest.toml` loading, merging, and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Both Copies From the Original
//!
//! The display copy and the thumbnail are each resampled from the decoded
//! original using its natural dimensions. The thumbnail never inherits the
//! display copy's resampling, and the order of the two steps does not matter.
//!
//! ## Fresh Names, No Overwrites
//!
//! Every call draws a new token, so concurrent uploads write disjoint files
//! and need no lock. The pipeline still refuses to place a file onto an
//! existing name, and never rolls back a file it did not create.
//!
//! ## No Persistence Here
//!
//! The pipeline knows nothing about databases. A successful
//! [`UploadOutcome`](upload::UploadOutcome) converts into a
//! [`PictureRecord`](types::PictureRecord); storing it is the caller's job.

pub mod config;
pub mod imaging;
pub mod incoming;
pub mod naming;
pub mod output;
pub mod rollback;
pub mod store;
pub mod types;
pub mod upload;

#[cfg(test)]
pub(crate) mod test_helpers;
