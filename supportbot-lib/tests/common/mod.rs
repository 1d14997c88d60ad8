//! Deterministic stand-ins for the embedding and QA models.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use supportbot_lib::embed::{Embedder, Embedding};
use supportbot_lib::extract::{Answer, Extractor};
use supportbot_lib::{Error, Result};

pub const PASSWORD: &str = "Reset your password via the settings page.";
pub const REFUND: &str = "Refunds are processed within 14 days.";
pub const PASSWORD_QUERY: &str = "How do I reset my password?";
pub const MOON_QUERY: &str = "How do I fly to the moon?";

pub fn faq_text() -> String {
    format!("{PASSWORD}\n\n{REFUND}")
}

pub fn faq_file() -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{}", faq_text()).unwrap();
    file
}

/// Embeds texts by table lookup; unknown texts map to the zero vector.
pub struct TableEmbedder {
    table: HashMap<String, Embedding>,
}

impl TableEmbedder {
    /// Password section along x, refund section along y. The password query
    /// scores 0.9 against the password section; the moon query scores 0.1
    /// against both.
    pub fn faq() -> Self {
        let mut table = HashMap::new();
        table.insert(PASSWORD.to_string(), vec![1.0, 0.0, 0.0]);
        table.insert(REFUND.to_string(), vec![0.0, 1.0, 0.0]);
        table.insert(PASSWORD_QUERY.to_string(), vec![0.9, 0.19f32.sqrt(), 0.0]);
        table.insert(MOON_QUERY.to_string(), vec![0.1, 0.1, 0.98f32.sqrt()]);
        Self { table }
    }
}

impl Embedder for TableEmbedder {
    fn embed_documents(&mut self, texts: &[&str]) -> Result<Vec<Embedding>> {
        texts.iter().map(|t| self.embed_query(t)).collect()
    }

    fn embed_query(&mut self, text: &str) -> Result<Embedding> {
        Ok(self
            .table
            .get(text)
            .cloned()
            .unwrap_or_else(|| vec![0.0; 3]))
    }

    fn dimension(&self) -> usize {
        3
    }

    fn model_name(&self) -> &str {
        "table"
    }
}

/// Returns a fixed answer and counts invocations.
pub struct StubExtractor {
    answer: Option<Answer>,
    calls: Arc<AtomicUsize>,
}

impl StubExtractor {
    pub fn answering(text: &str, confidence: f32) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let stub = Self {
            answer: Some(Answer {
                text: text.to_string(),
                confidence,
            }),
            calls: Arc::clone(&calls),
        };
        (stub, calls)
    }

    /// Fails every call with `ExtractionFailed`.
    pub fn failing() -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let stub = Self {
            answer: None,
            calls: Arc::clone(&calls),
        };
        (stub, calls)
    }
}

impl Extractor for StubExtractor {
    fn extract(&mut self, _question: &str, _context: &str) -> Result<Answer> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answer
            .clone()
            .ok_or_else(|| Error::ExtractionFailed("malformed response".to_string()))
    }
}
