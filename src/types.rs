//! Values handed to the persistence layer.
//!
//! The pipeline never talks to a database. A caller turns a successful
//! [`UploadOutcome`](crate::upload::UploadOutcome) into a [`PictureRecord`]
//! and stores it however it likes; tag and comment relations are resolved
//! there by id, not held here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A picture as the gallery persists it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PictureRecord {
    /// Display name chosen by the uploader
    pub name: String,
    /// Display file in the store (resized to the display bound)
    pub picture_filename: String,
    /// Thumbnail file in the store
    pub thumb_filename: String,
    /// Routing key for the picture page
    pub slug_name: String,
    pub added_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PictureRecord {
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
