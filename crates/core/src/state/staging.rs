//! # Artifact Staging
//!
//! Files the user has added locally and not yet transmitted. The sequence
//! only grows or is emptied as a whole; its order is the order parts are
//! attached to the upload request.

use serde::{Deserialize, Serialize};

/// A locally staged file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    /// File name sent with the multipart part
    pub name: String,
    /// Raw bytes
    #[serde(skip)]
    pub content: Vec<u8>,
    /// Declared media type
    pub media_type: String,
}

impl Artifact {
    pub fn new(
        name: impl Into<String>,
        content: impl Into<Vec<u8>>,
        media_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            media_type: media_type.into(),
        }
    }

    pub fn size(&self) -> usize {
        self.content.len()
    }
}

/// Ordered, append-only store of staged artifacts
#[derive(Debug, Clone, Default)]
pub struct StagingStore {
    artifacts: Vec<Artifact>,
}

impl StagingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append to the end. No deduplication, no validation.
    pub fn add(&mut self, files: impl IntoIterator<Item = Artifact>) {
        self.artifacts.extend(files);
    }

    pub fn clear(&mut self) {
        self.artifacts.clear();
    }

    pub fn artifacts(&self) -> &[Artifact] {
        &self.artifacts
    }

    pub fn names(&self) -> Vec<&str> {
        self.artifacts.iter().map(|a| a.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    pub fn total_bytes(&self) -> usize {
        self.artifacts.iter().map(Artifact::size).sum()
    }
}
