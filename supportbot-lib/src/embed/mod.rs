//! Text embedding using local models
//!
//! Uses sentence-transformers/all-MiniLM-L6-v2 via the fastembed crate (ONNX
//! runtime).
//!
//! # Model Details
//!
//! - Dimensions: 384
//! - Max tokens: 256
//!
//! # Usage
//!
//! ```ignore
//! use supportbot_lib::embed::{Embedder, MiniLmEmbedder};
//!
//! let mut embedder = MiniLmEmbedder::new()?;
//!
//! // Embed sections (for indexing)
//! let section_embeddings = embedder.embed_documents(&["Refunds...", "Passwords..."])?;
//!
//! // Embed query (for searching)
//! let query_embedding = embedder.embed_query("How do I reset my password?")?;
//! ```
//!
//! Sections and queries must be embedded by the same model. Nothing checks
//! this at runtime; the retriever owns exactly one embedder for both.

use crate::Result;

/// A vector embedding - fixed size array of floats
pub type Embedding = Vec<f32>;

/// Trait for text embedding models
pub trait Embedder: Send + Sync {
    /// Embed multiple documents for indexing
    ///
    /// Returns one embedding per input, in input order.
    fn embed_documents(&mut self, texts: &[&str]) -> Result<Vec<Embedding>>;

    /// Embed a single query for searching
    fn embed_query(&mut self, text: &str) -> Result<Embedding>;

    /// Returns the embedding dimension
    fn dimension(&self) -> usize;

    /// Returns the model name/identifier
    fn model_name(&self) -> &str;
}

mod minilm;
pub use minilm::*;
