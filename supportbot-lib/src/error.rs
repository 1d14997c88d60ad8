//! Error types for SupportBot

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for SupportBot operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in SupportBot operations
#[derive(Error, Debug)]
pub enum Error {
    /// The source document does not exist
    #[error("document not found: {}", .0.display())]
    DocumentNotFound(PathBuf),

    /// The document contains no non-empty sections
    #[error("document contains no sections")]
    EmptyDocument,

    /// Failed to load or run the embedding model
    #[error("embedding error: {0}")]
    Embedding(String),

    /// The question-answering model failed or returned garbage
    #[error("extraction failed: {0}")]
    ExtractionFailed(String),

    /// Failed to store or retrieve from vector store
    #[error("store error: {0}")]
    Store(String),

    /// Invalid input provided
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
