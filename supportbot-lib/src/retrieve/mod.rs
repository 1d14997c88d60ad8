//! Section retrieval
//!
//! Combines embedder and store into a top-1 lookup.
//!
//! # Usage
//!
//! ```ignore
//! use supportbot_lib::retrieve::{Retriever, SectionRetriever};
//!
//! let documents = DocumentStore::open("data/faq.txt")?;
//! let mut retriever = Retriever::from_document(embedder, MemoryStore::new(), &documents)?;
//! let best = retriever.find_best_section("How do I reset my password?")?;
//! ```

use tracing::{debug, info};

use crate::document::DocumentStore;
use crate::embed::Embedder;
use crate::section::Section;
use crate::store::{RetrievalResult, VectorStore};
use crate::{Error, Result};

/// Anything that can pick the best section for a query.
pub trait SectionRetriever: Send {
    /// The single most similar section and its score.
    fn find_best_section(&mut self, query: &str) -> Result<RetrievalResult>;
}

impl<T: SectionRetriever + ?Sized> SectionRetriever for Box<T> {
    fn find_best_section(&mut self, query: &str) -> Result<RetrievalResult> {
        (**self).find_best_section(query)
    }
}

/// Retriever combining an embedder with a vector store.
pub struct Retriever<E: Embedder, S: VectorStore> {
    embedder: E,
    store: S,
}

impl<E: Embedder, S: VectorStore> Retriever<E, S> {
    /// Create a retriever over an empty store.
    #[must_use]
    pub fn new(embedder: E, store: S) -> Self {
        Self { embedder, store }
    }

    /// Create a retriever and index every section of a document.
    ///
    /// Fails with [`Error::EmptyDocument`] if the document has no sections.
    pub fn from_document(embedder: E, store: S, documents: &DocumentStore) -> Result<Self> {
        if documents.is_empty() {
            return Err(Error::EmptyDocument);
        }
        let mut retriever = Self::new(embedder, store);
        retriever.index(documents.sections())?;
        Ok(retriever)
    }

    /// Index sections by computing embeddings and storing them.
    ///
    /// All sections are embedded in one batch, in order.
    pub fn index(&mut self, sections: &[Section]) -> Result<()> {
        if sections.is_empty() {
            return Ok(());
        }

        let texts: Vec<&str> = sections.iter().map(|s| s.content.as_str()).collect();
        let embeddings = self.embedder.embed_documents(&texts)?;
        self.store.insert(sections, &embeddings)?;

        info!(
            sections = sections.len(),
            model = self.embedder.model_name(),
            "Precomputed section embeddings"
        );
        Ok(())
    }

    /// Returns the number of indexed sections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns `true` if no sections are indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Returns a reference to the embedder.
    #[must_use]
    pub fn embedder(&self) -> &E {
        &self.embedder
    }
}

impl<E: Embedder, S: VectorStore> SectionRetriever for Retriever<E, S> {
    fn find_best_section(&mut self, query: &str) -> Result<RetrievalResult> {
        if self.store.is_empty() {
            return Err(Error::EmptyDocument);
        }

        let query_embedding = self.embedder.embed_query(query)?;
        let best = self
            .store
            .best(&query_embedding)?
            .ok_or(Error::EmptyDocument)?;

        info!(
            "Query: '{}'. Best section index: {}, Score: {:.4}",
            query,
            best.section.position(),
            best.score
        );
        debug!(section = %best.section.content, "retrieved section");
        Ok(best)
    }
}
