//! Retrieve, threshold, extract, threshold.
//!
//! The pipeline holds no conversation state. Every outcome carries the
//! retrieval it was based on so the caller can remember it.

use serde::Serialize;
use tracing::{info, warn};

use crate::extract::{Answer, Extractor};
use crate::retrieve::SectionRetriever;
use crate::store::RetrievalResult;
use crate::Result;

/// Minimum cosine similarity for a section to be worth asking the extractor.
pub const SIMILARITY_THRESHOLD: f32 = 0.3;
/// Minimum extractor confidence for its answer to be returned.
pub const CONFIDENCE_THRESHOLD: f32 = 0.1;

pub const LOW_SIMILARITY_RESPONSE: &str = "I don't have enough information to answer that.";
pub const LOW_CONFIDENCE_RESPONSE: &str =
    "I was able to find some information, but I'm not confident in the answer.";

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Thresholds {
    pub similarity: f32,
    pub confidence: f32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            similarity: SIMILARITY_THRESHOLD,
            confidence: CONFIDENCE_THRESHOLD,
        }
    }
}

/// How the pipeline arrived at its response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// The extractor's answer was returned
    Answered,
    /// No section was similar enough; the extractor was not called
    LowSimilarity,
    /// The extractor was not confident enough
    LowConfidence,
}

#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutcome {
    pub response: String,
    pub verdict: Verdict,
    pub retrieval: RetrievalResult,
    /// Raw extractor output, `None` when it was skipped
    pub answer: Option<Answer>,
}

impl PipelineOutcome {
    /// Whether the response is one of the canned fallback strings.
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.verdict != Verdict::Answered
    }
}

pub struct AnswerPipeline<R: SectionRetriever, X: Extractor> {
    retriever: R,
    extractor: X,
    thresholds: Thresholds,
}

impl<R: SectionRetriever, X: Extractor> AnswerPipeline<R, X> {
    /// Create a pipeline with the default thresholds.
    #[must_use]
    pub fn new(retriever: R, extractor: X) -> Self {
        Self::with_thresholds(retriever, extractor, Thresholds::default())
    }

    #[must_use]
    pub fn with_thresholds(retriever: R, extractor: X, thresholds: Thresholds) -> Self {
        Self {
            retriever,
            extractor,
            thresholds,
        }
    }

    /// Answer a query.
    ///
    /// Low similarity and low confidence are not errors: they produce a
    /// fallback response. Retrieval and extraction failures propagate.
    pub fn answer(&mut self, query: &str) -> Result<PipelineOutcome> {
        let retrieval = self.retrieve(query)?;
        self.answer_from(query, retrieval)
    }

    /// First half of [`answer`](Self::answer): the best section for `query`.
    pub fn retrieve(&mut self, query: &str) -> Result<RetrievalResult> {
        self.retriever.find_best_section(query)
    }

    /// Second half of [`answer`](Self::answer): apply the thresholds and the
    /// extractor to an earlier retrieval.
    pub fn answer_from(
        &mut self,
        query: &str,
        retrieval: RetrievalResult,
    ) -> Result<PipelineOutcome> {
        if retrieval.score < self.thresholds.similarity {
            warn!(
                "Relevance score {:.4} is below threshold. Responding with fallback.",
                retrieval.score
            );
            return Ok(PipelineOutcome {
                response: LOW_SIMILARITY_RESPONSE.to_string(),
                verdict: Verdict::LowSimilarity,
                retrieval,
                answer: None,
            });
        }

        info!(
            "Answering query '{}' using retrieved context with score {:.4}.",
            query, retrieval.score
        );
        let answer = self.extractor.extract(query, &retrieval.section.content)?;

        if answer.confidence < self.thresholds.confidence {
            warn!("Low QA model confidence score ({:.2}).", answer.confidence);
            return Ok(PipelineOutcome {
                response: LOW_CONFIDENCE_RESPONSE.to_string(),
                verdict: Verdict::LowConfidence,
                retrieval,
                answer: Some(answer),
            });
        }

        info!(
            "Generated answer: '{}' with confidence {:.2}",
            answer.text, answer.confidence
        );
        Ok(PipelineOutcome {
            response: answer.text.clone(),
            verdict: Verdict::Answered,
            retrieval,
            answer: Some(answer),
        })
    }

    #[must_use]
    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    #[must_use]
    pub fn extractor(&self) -> &X {
        &self.extractor
    }
}
