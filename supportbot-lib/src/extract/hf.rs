use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::extract::{Answer, Extractor};
use crate::{Error, Result};

/// Default inference base URL.
pub const DEFAULT_QA_ENDPOINT: &str = "https://api-inference.huggingface.co";
/// Default extractive QA model.
pub const DEFAULT_QA_MODEL: &str = "distilbert/distilbert-base-uncased-distilled-squad";

/// Extractor backed by a Hugging Face style question-answering endpoint.
///
/// Posts `{"inputs": {"question", "context"}}` to `{base}/models/{model}` and
/// reads back `{answer, score, start, end}`. Blocking; call it off the async
/// runtime.
pub struct HfExtractor {
    client: Client,
    endpoint: String,
    model: String,
}

impl HfExtractor {
    /// Build a client for `model` served under `base_url`.
    ///
    /// `token` is sent as a bearer token when present.
    pub fn new(
        base_url: &str,
        model: &str,
        token: Option<&str>,
        timeout: Duration,
    ) -> Result<Self> {
        if model.trim().is_empty() {
            return Err(Error::InvalidInput("missing QA model name".to_string()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(token) = token.map(str::trim).filter(|t| !t.is_empty()) {
            let auth = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| Error::InvalidInput("invalid QA API token".to_string()))?;
            headers.insert(AUTHORIZATION, auth);
        }

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| Error::ExtractionFailed(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: format!("{}/models/{}", base_url.trim_end_matches('/'), model.trim()),
            model: model.trim().to_string(),
        })
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Extractor for HfExtractor {
    fn extract(&mut self, question: &str, context: &str) -> Result<Answer> {
        let request = QaRequest {
            inputs: QaInputs { question, context },
        };
        let resp = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .map_err(|e| Error::ExtractionFailed(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp
                .text()
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            return Err(Error::ExtractionFailed(format!(
                "QA request failed ({status}): {body}"
            )));
        }

        let parsed: QaResponse = resp
            .json()
            .map_err(|e| Error::ExtractionFailed(format!("failed to parse QA response: {e}")))?;
        let answer = parsed.into_answer();
        debug!(model = %self.model, answer = %answer.text, confidence = answer.confidence, "QA response");
        Ok(answer)
    }
}

#[derive(Serialize)]
struct QaRequest<'a> {
    inputs: QaInputs<'a>,
}

#[derive(Serialize)]
struct QaInputs<'a> {
    question: &'a str,
    context: &'a str,
}

/// The endpoint returns a bare object, or a list when asked for top-k.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum QaResponse {
    One(QaSpan),
    Many(Vec<QaSpan>),
}

#[derive(Debug, Default, Deserialize)]
struct QaSpan {
    #[serde(default)]
    answer: Option<String>,
    #[serde(default)]
    score: Option<f32>,
}

impl QaResponse {
    fn into_answer(self) -> Answer {
        let span = match self {
            Self::One(span) => Some(span),
            Self::Many(spans) => spans.into_iter().next(),
        };
        let Some(span) = span else {
            return Answer::none();
        };

        let fallback = Answer::none();
        Answer {
            text: span
                .answer
                .filter(|a| !a.trim().is_empty())
                .unwrap_or(fallback.text),
            confidence: span.score.unwrap_or(fallback.confidence).max(0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::NO_ANSWER_TEXT;

    fn parse(json: &str) -> Answer {
        serde_json::from_str::<QaResponse>(json)
            .unwrap()
            .into_answer()
    }

    #[test]
    fn test_single_object_response() {
        let answer = parse(r#"{"answer": "via the settings page", "score": 0.8, "start": 19, "end": 41}"#);

        assert_eq!(answer.text, "via the settings page");
        assert!((answer.confidence - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_list_response_takes_first() {
        let answer = parse(r#"[{"answer": "14 days", "score": 0.6}, {"answer": "days", "score": 0.2}]"#);

        assert_eq!(answer.text, "14 days");
    }

    #[test]
    fn test_missing_answer_uses_fallback() {
        let answer = parse(r#"{"score": 0.5}"#);

        assert_eq!(answer.text, NO_ANSWER_TEXT);
        assert!((answer.confidence - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_empty_response_is_no_answer() {
        assert_eq!(parse("[]"), Answer::none());
        assert_eq!(parse("{}"), Answer::none());
    }

    #[test]
    fn test_endpoint_joins_base_and_model() {
        let extractor = HfExtractor::new(
            "http://localhost:8000/",
            "my-model",
            None,
            Duration::from_secs(1),
        )
        .unwrap();

        assert_eq!(extractor.endpoint(), "http://localhost:8000/models/my-model");
    }

    #[test]
    fn test_blank_model_rejected() {
        let result = HfExtractor::new(DEFAULT_QA_ENDPOINT, "  ", None, Duration::from_secs(1));

        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    #[ignore] // Requires network access and an inference token in HF_TOKEN
    fn test_answers_from_context() {
        let token = std::env::var("HF_TOKEN").ok();
        let mut extractor = HfExtractor::new(
            DEFAULT_QA_ENDPOINT,
            DEFAULT_QA_MODEL,
            token.as_deref(),
            Duration::from_secs(30),
        )
        .unwrap();

        let answer = extractor
            .extract(
                "How long do refunds take?",
                "Refunds are processed within 14 days.",
            )
            .unwrap();

        assert!(answer.text.contains("14"), "got {:?}", answer.text);
    }
}
