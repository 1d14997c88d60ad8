//! Extractive question answering
//!
//! An extractor copies the answer to a question out of a context passage and
//! reports how confident it is. The pipeline treats it as a black box.

use serde::{Deserialize, Serialize};

use crate::Result;

/// Answer text used when the model finds no span at all.
pub const NO_ANSWER_TEXT: &str = "I could not find a specific answer in the document.";

/// An extracted answer span
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub text: String,
    /// Model score, 0.0 and up
    pub confidence: f32,
}

impl Answer {
    /// The answer reported when the model returns nothing usable.
    #[must_use]
    pub fn none() -> Self {
        Self {
            text: NO_ANSWER_TEXT.to_string(),
            confidence: 0.0,
        }
    }
}

pub trait Extractor: Send {
    /// Extract an answer to `question` from `context`.
    ///
    /// Errors are reported as [`crate::Error::ExtractionFailed`].
    fn extract(&mut self, question: &str, context: &str) -> Result<Answer>;
}

impl<T: Extractor + ?Sized> Extractor for Box<T> {
    fn extract(&mut self, question: &str, context: &str) -> Result<Answer> {
        (**self).extract(question, context)
    }
}

mod hf;

pub use hf::*;
