//! Entity records consumed from the admin tool's records API.
//!
//! The resolver treats entities as read-only input: it derives candidate
//! URLs and a stable cache key from them, but never mutates or stores them.

use serde::{Deserialize, Serialize};

/// A monster record that may have an associated image.
///
/// This mirrors the shape the records API emits. Only the fields the
/// resolver consumes are modeled here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    /// Stable numeric record identifier
    pub id: u64,

    /// Display name, used to derive guessed filenames
    pub name: String,

    /// Optional alternate reading or spelling of the name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternate_name: Option<String>,

    /// Image URL supplied by crawled metadata, if any.
    ///
    /// When present it is tried before any guessed candidate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata_image_url: Option<String>,
}

impl Entity {
    /// Create an entity with just an id and name.
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            alternate_name: None,
            metadata_image_url: None,
        }
    }

    /// Set the alternate name.
    pub fn with_alternate_name(mut self, alternate_name: impl Into<String>) -> Self {
        self.alternate_name = Some(alternate_name.into());
        self
    }

    /// Set the metadata-supplied image URL.
    pub fn with_metadata_image_url(mut self, url: impl Into<String>) -> Self {
        self.metadata_image_url = Some(url.into());
        self
    }
}
