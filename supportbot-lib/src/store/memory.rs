use crate::embed::Embedding;
use crate::section::Section;
use crate::store::{cosine_similarity, RetrievalResult, VectorStore};
use crate::{Error, Result};

/// In-memory vector store.
///
/// Uses brute-force cosine similarity search. An FAQ document has a few
/// dozen sections at most, so a linear scan is all it needs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    sections: Vec<Section>,
    embeddings: Vec<Embedding>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn scored<'a>(&'a self, query: &'a Embedding) -> impl Iterator<Item = (usize, f32)> + 'a {
        self.embeddings
            .iter()
            .enumerate()
            .map(move |(i, embedding)| (i, cosine_similarity(query, embedding)))
    }

    fn result(&self, index: usize, score: f32) -> RetrievalResult {
        RetrievalResult {
            section: self.sections[index].clone(),
            score,
        }
    }
}

impl VectorStore for MemoryStore {
    fn insert(&mut self, sections: &[Section], embeddings: &[Embedding]) -> Result<()> {
        if sections.len() != embeddings.len() {
            return Err(Error::Store(format!(
                "{} sections but {} embeddings",
                sections.len(),
                embeddings.len()
            )));
        }
        self.sections.extend_from_slice(sections);
        self.embeddings.extend_from_slice(embeddings);
        Ok(())
    }

    fn best(&self, query: &Embedding) -> Result<Option<RetrievalResult>> {
        // strict comparison keeps the first index on ties
        let best = self.scored(query).fold(None, |best, (i, score)| match best {
            Some((_, top)) if score <= top => best,
            _ => Some((i, score)),
        });

        Ok(best.map(|(i, score)| self.result(i, score)))
    }

    fn len(&self) -> usize {
        self.sections.len()
    }
}
