//! Simulated user feedback
//!
//! Stands in for a real rating prompt in the batch demo. Labels come from a
//! [`FeedbackSource`] so runs can be random or scripted.
//!
//! Per query the loop makes at most one adjustment, whatever label comes
//! back.

use std::collections::VecDeque;
use std::fmt;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::extract::Extractor;
use crate::pipeline::AnswerPipeline;
use crate::retrieve::SectionRetriever;
use crate::store::RetrievalResult;
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackLabel {
    Good,
    TooVague,
    NotHelpful,
}

impl FeedbackLabel {
    pub const ALL: [FeedbackLabel; 3] = [Self::NotHelpful, Self::TooVague, Self::Good];

    /// Whether this label asks for more context.
    #[must_use]
    pub fn is_negative(self) -> bool {
        matches!(self, Self::TooVague | Self::NotHelpful)
    }
}

impl fmt::Display for FeedbackLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Good => "good",
            Self::TooVague => "too vague",
            Self::NotHelpful => "not helpful",
        })
    }
}

/// Source of feedback labels
pub trait FeedbackSource {
    fn next_label(&mut self) -> FeedbackLabel;
}

/// Uniformly random labels.
pub struct RandomFeedback {
    rng: StdRng,
}

impl RandomFeedback {
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible label sequence.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomFeedback {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedbackSource for RandomFeedback {
    fn next_label(&mut self) -> FeedbackLabel {
        *FeedbackLabel::ALL
            .choose(&mut self.rng)
            .unwrap_or(&FeedbackLabel::Good)
    }
}

/// Replays a fixed sequence of labels, starting over when it runs out.
///
/// An empty script always answers [`FeedbackLabel::Good`].
pub struct ScriptedFeedback {
    labels: VecDeque<FeedbackLabel>,
}

impl ScriptedFeedback {
    #[must_use]
    pub fn new(labels: impl IntoIterator<Item = FeedbackLabel>) -> Self {
        Self {
            labels: labels.into_iter().collect(),
        }
    }
}

impl FeedbackSource for ScriptedFeedback {
    fn next_label(&mut self) -> FeedbackLabel {
        let Some(label) = self.labels.pop_front() else {
            return FeedbackLabel::Good;
        };
        self.labels.push_back(label);
        label
    }
}

/// Response to a feedback label.
///
/// Negative labels get the full retrieved section; `good` gets an empty
/// string, which ends the loop.
#[must_use]
pub fn adjust(query: &str, label: FeedbackLabel, last_retrieval: &RetrievalResult) -> String {
    info!("Adjusting response for '{query}' based on feedback: '{label}'");
    if label.is_negative() {
        format!(
            "Let me provide more context: '{}'",
            last_retrieval.section.content
        )
    } else {
        String::new()
    }
}

/// What happened to one query in the feedback loop
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryTranscript {
    pub query: String,
    pub initial: String,
    /// `None` when the initial response was a fallback
    pub feedback: Option<FeedbackLabel>,
    /// `None` unless the feedback was negative
    pub adjusted: Option<String>,
}

/// Drives queries through the pipeline with one round of feedback each.
pub struct FeedbackLoop<F: FeedbackSource> {
    source: F,
}

impl<F: FeedbackSource> FeedbackLoop<F> {
    #[must_use]
    pub fn new(source: F) -> Self {
        Self { source }
    }

    pub fn process<R, X>(
        &mut self,
        pipeline: &mut AnswerPipeline<R, X>,
        query: &str,
    ) -> Result<QueryTranscript>
    where
        R: SectionRetriever,
        X: Extractor,
    {
        info!("--- Processing new query: {query} ---");
        let outcome = pipeline.answer(query)?;
        let mut transcript = QueryTranscript {
            query: query.to_string(),
            initial: outcome.response.clone(),
            feedback: None,
            adjusted: None,
        };

        if outcome.is_fallback() {
            info!("Initial response was a fallback. Skipping feedback loop.");
            return Ok(transcript);
        }

        let label = self.source.next_label();
        info!("Simulated feedback received: '{label}'");
        transcript.feedback = Some(label);

        if label.is_negative() {
            transcript.adjusted = Some(adjust(query, label, &outcome.retrieval));
            info!("One adjustment attempt made. Ending loop.");
        } else {
            info!("Feedback was 'good'. Ending loop.");
        }

        info!("--- Finished processing query: {query} ---");
        Ok(transcript)
    }

    /// Process queries in order, stopping at the first pipeline error.
    pub fn run<R, X>(
        &mut self,
        pipeline: &mut AnswerPipeline<R, X>,
        queries: &[impl AsRef<str>],
    ) -> Result<Vec<QueryTranscript>>
    where
        R: SectionRetriever,
        X: Extractor,
    {
        queries
            .iter()
            .map(|q| self.process(pipeline, q.as_ref()))
            .collect()
    }

    pub fn source_mut(&mut self) -> &mut F {
        &mut self.source
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::extract::Answer;
    use crate::pipeline::LOW_SIMILARITY_RESPONSE;
    use crate::section::{Section, SectionMetadata};

    const SECTION: &str = "Reset your password via the settings page.";

    struct FixedRetriever(f32);

    impl SectionRetriever for FixedRetriever {
        fn find_best_section(&mut self, _query: &str) -> Result<RetrievalResult> {
            Ok(retrieval(self.0))
        }
    }

    struct FixedExtractor;

    impl Extractor for FixedExtractor {
        fn extract(&mut self, _question: &str, _context: &str) -> Result<Answer> {
            Ok(Answer {
                text: "via the settings page".to_string(),
                confidence: 0.8,
            })
        }
    }

    /// Counts how often it was asked.
    struct CountingSource {
        inner: ScriptedFeedback,
        calls: usize,
    }

    impl FeedbackSource for CountingSource {
        fn next_label(&mut self) -> FeedbackLabel {
            self.calls += 1;
            self.inner.next_label()
        }
    }

    fn retrieval(score: f32) -> RetrievalResult {
        RetrievalResult {
            section: Section {
                id: "s0".to_string(),
                content: SECTION.to_string(),
                metadata: SectionMetadata::default(),
            },
            score,
        }
    }

    fn counting(labels: &[FeedbackLabel]) -> FeedbackLoop<CountingSource> {
        FeedbackLoop::new(CountingSource {
            inner: ScriptedFeedback::new(labels.iter().copied()),
            calls: 0,
        })
    }

    #[test]
    fn test_adjust_negative_labels_add_context() {
        for label in [FeedbackLabel::TooVague, FeedbackLabel::NotHelpful] {
            assert_eq!(
                adjust("q", label, &retrieval(0.9)),
                format!("Let me provide more context: '{SECTION}'")
            );
        }
    }

    #[test]
    fn test_adjust_good_is_empty() {
        assert_eq!(adjust("q", FeedbackLabel::Good, &retrieval(0.9)), "");
    }

    #[test]
    fn test_single_adjustment_even_when_negative() {
        let mut pipeline = AnswerPipeline::new(FixedRetriever(0.9), FixedExtractor);
        let mut feedback = counting(&[FeedbackLabel::NotHelpful, FeedbackLabel::TooVague]);

        let transcript = feedback.process(&mut pipeline, "reset?").unwrap();

        assert_eq!(transcript.initial, "via the settings page");
        assert_eq!(transcript.feedback, Some(FeedbackLabel::NotHelpful));
        assert_eq!(
            transcript.adjusted.as_deref(),
            Some(format!("Let me provide more context: '{SECTION}'").as_str())
        );
        assert_eq!(feedback.source_mut().calls, 1);
    }

    #[test]
    fn test_good_feedback_ends_without_adjustment() {
        let mut pipeline = AnswerPipeline::new(FixedRetriever(0.9), FixedExtractor);
        let mut feedback = counting(&[FeedbackLabel::Good]);

        let transcript = feedback.process(&mut pipeline, "reset?").unwrap();

        assert_eq!(transcript.feedback, Some(FeedbackLabel::Good));
        assert!(transcript.adjusted.is_none());
    }

    #[test]
    fn test_fallback_skips_feedback() {
        let mut pipeline = AnswerPipeline::new(FixedRetriever(0.1), FixedExtractor);
        let mut feedback = counting(&[FeedbackLabel::NotHelpful]);

        let transcript = feedback.process(&mut pipeline, "moon?").unwrap();

        assert_eq!(transcript.initial, LOW_SIMILARITY_RESPONSE);
        assert!(transcript.feedback.is_none());
        assert!(transcript.adjusted.is_none());
        assert_eq!(feedback.source_mut().calls, 0);
    }

    #[test]
    fn test_run_keeps_query_order() {
        let mut pipeline = AnswerPipeline::new(FixedRetriever(0.9), FixedExtractor);
        let mut feedback = FeedbackLoop::new(ScriptedFeedback::new([
            FeedbackLabel::Good,
            FeedbackLabel::TooVague,
        ]));

        let transcripts = feedback.run(&mut pipeline, &["a", "b", "c"]).unwrap();

        let queries: Vec<&str> = transcripts.iter().map(|t| t.query.as_str()).collect();
        assert_eq!(queries, ["a", "b", "c"]);
        let labels: Vec<_> = transcripts.iter().map(|t| t.feedback).collect();
        assert_eq!(
            labels,
            [
                Some(FeedbackLabel::Good),
                Some(FeedbackLabel::TooVague),
                Some(FeedbackLabel::Good)
            ]
        );
    }

    #[test]
    fn test_empty_script_is_good() {
        let mut source = ScriptedFeedback::new(Vec::<FeedbackLabel>::new());
        assert_eq!(source.next_label(), FeedbackLabel::Good);
    }

    #[test]
    fn test_seeded_random_is_reproducible() {
        let mut a = RandomFeedback::with_seed(7);
        let mut b = RandomFeedback::with_seed(7);

        let left: Vec<_> = (0..20).map(|_| a.next_label()).collect();
        let right: Vec<_> = (0..20).map(|_| b.next_label()).collect();

        assert_eq!(left, right);
    }

    #[test]
    fn test_random_covers_every_label() {
        let mut source = RandomFeedback::with_seed(42);

        let seen: HashSet<_> = (0..200).map(|_| source.next_label()).collect();

        assert_eq!(seen.len(), FeedbackLabel::ALL.len());
    }

    #[test]
    fn test_label_display_and_serde() {
        assert_eq!(FeedbackLabel::TooVague.to_string(), "too vague");
        assert_eq!(
            serde_json::to_string(&FeedbackLabel::NotHelpful).unwrap(),
            "\"not_helpful\""
        );
    }
}
