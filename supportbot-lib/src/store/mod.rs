//! Vector storage backends
//!
//! # Storage Model
//!
//! Each stored item consists of:
//! - Section: the original paragraph and its metadata
//! - Embedding: the vector representation
//!
//! Items keep their insertion order. The order only matters for ties: when
//! two sections score the same, the one inserted first wins.
//!
//! # Usage
//!
//! ```ignore
//! use supportbot_lib::store::{VectorStore, MemoryStore};
//!
//! let mut store = MemoryStore::new();
//!
//! // Insert sections with their embeddings
//! store.insert(&sections, &embeddings)?;
//!
//! // Best match by cosine similarity
//! let best = store.best(&query_embedding)?;
//! ```

use serde::Serialize;

use crate::embed::Embedding;
use crate::section::Section;
use crate::Result;

/// A retrieved section with its similarity score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetrievalResult {
    /// The matched section
    pub section: Section,
    /// Cosine similarity to the query, -1.0 to 1.0
    pub score: f32,
}

/// Trait for vector storage backends
pub trait VectorStore: Send + Sync {
    /// Insert sections with their embeddings
    ///
    /// # Arguments
    /// * `sections` - The sections to store
    /// * `embeddings` - Corresponding embeddings (must be same length)
    fn insert(&mut self, sections: &[Section], embeddings: &[Embedding]) -> Result<()>;

    /// The single most similar section, or `None` when the store is empty
    ///
    /// Equal scores resolve to the section inserted first.
    fn best(&self, query_embedding: &Embedding) -> Result<Option<RetrievalResult>>;

    /// Get total number of stored sections
    fn len(&self) -> usize;

    /// Check if store is empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Compute cosine similarity between two vectors.
///
/// Returns a value in [-1, 1] where 1 means identical direction. A zero
/// vector is similar to nothing and scores 0.
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "vectors must have same length");

    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

mod memory;

pub use memory::*;
