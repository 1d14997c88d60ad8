//! Document sectioning
//!
//! A section is the unit of retrieval: one paragraph of the FAQ document.
//! Sections are identified by their position in the document; the order is
//! stable, but retrieval never depends on it beyond tie-breaking.
//!
//! # Implementing a Sectionizer
//!
//! ```ignore
//! use supportbot_lib::section::{Section, SectionMetadata, Sectionizer};
//!
//! struct MySectionizer;
//!
//! impl Sectionizer for MySectionizer {
//!     fn sectionize(&self, content: &str, metadata: SectionMetadata) -> Vec<Section> {
//!         // Your splitting logic here
//!         todo!()
//!     }
//!
//!     fn name(&self) -> &str {
//!         "mine"
//!     }
//! }
//! ```

use std::hash::{DefaultHasher, Hash, Hasher};

use serde::{Deserialize, Serialize};

/// A section of text with its metadata
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct Section {
    /// Content hash, stable across restarts for the same text
    pub id: String,
    /// The trimmed paragraph text
    pub content: String,
    /// Metadata about the source and position
    pub metadata: SectionMetadata,
}

impl Section {
    /// Position of this section within its document (0-indexed).
    #[must_use]
    pub fn position(&self) -> usize {
        self.metadata.position
    }
}

/// Metadata associated with a section
#[derive(Debug, Clone, Default, Serialize, Deserialize, Eq, PartialEq)]
pub struct SectionMetadata {
    /// Source document identifier (usually its path)
    pub source_id: Option<String>,
    /// Position within the source document (0-indexed)
    pub position: usize,
    /// Total number of sections from this source
    pub total_sections: Option<usize>,
}

/// Trait for document sectioning strategies
pub trait Sectionizer: Send + Sync {
    /// Split content into sections
    ///
    /// # Arguments
    /// * `content` - The document text
    /// * `metadata` - Base metadata to attach to each section
    ///
    /// # Returns
    /// Sections in document order, each with its position filled in
    fn sectionize(&self, content: &str, metadata: SectionMetadata) -> Vec<Section>;

    /// Returns the name of this sectioning strategy
    fn name(&self) -> &str;
}

pub(crate) fn generate_id(string: &str) -> String {
    let mut hasher = DefaultHasher::new();
    string.hash(&mut hasher);
    format!("{:x}", hasher.finish())
}

mod blank_line;

pub use blank_line::*;
