//! HTTP front end
//!
//! | Method | Path           | Body / Response                               |
//! |--------|----------------|-----------------------------------------------|
//! | POST   | `/chat`        | `{"message"}` → `{"response"}`                |
//! | GET    | `/more_detail` | → `{"response"}` with the last full section    |
//! | GET    | `/`            | chat page                                      |
//! | GET    | `/healthz`     | 200                                            |
//!
//! Callers may send an `x-session-id` header to keep their "more detail"
//! context apart from other callers.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::conversation::{ConversationStore, DEFAULT_SESSION};
use crate::extract::Extractor;
use crate::pipeline::AnswerPipeline;
use crate::retrieve::SectionRetriever;
use crate::Error;

pub const SESSION_HEADER: &str = "x-session-id";
pub const MISSING_MESSAGE: &str = "Request must include a 'message'.";

const INDEX_HTML: &str = include_str!("../static/index.html");

/// Pipeline with its collaborators type-erased, as served over HTTP.
pub type DynPipeline = AnswerPipeline<Box<dyn SectionRetriever>, Box<dyn Extractor>>;

#[derive(Clone)]
pub struct AppState {
    pipeline: Arc<Mutex<DynPipeline>>,
    conversations: Arc<ConversationStore>,
}

impl AppState {
    #[must_use]
    pub fn new(pipeline: DynPipeline) -> Self {
        Self {
            pipeline: Arc::new(Mutex::new(pipeline)),
            conversations: Arc::new(ConversationStore::new()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatRequest {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Request must include a 'message'.")]
    MissingMessage,

    #[error(transparent)]
    Pipeline(#[from] Error),

    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::MissingMessage => StatusCode::BAD_REQUEST,
            Self::Pipeline(_) | Self::Internal(_) => {
                error!("request failed: {self}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/healthz", get(healthz))
        .route("/chat", post(chat))
        .route("/more_detail", get(more_detail))
        .with_state(state)
}

/// Bind `addr` and serve until the process is stopped.
pub async fn serve(addr: SocketAddr, state: AppState) -> crate::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("supportbot listening on http://{addr}");
    axum::serve(listener, create_app(state)).await?;
    Ok(())
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

async fn chat(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ChatResponse>, ApiError> {
    let message = serde_json::from_slice::<ChatRequest>(&body)
        .ok()
        .and_then(|r| r.message)
        .filter(|m| !m.is_empty())
        .ok_or(ApiError::MissingMessage)?;
    let session = session_id(&headers);

    let pipeline = Arc::clone(&state.pipeline);
    let conversations = Arc::clone(&state.conversations);
    let outcome = tokio::task::spawn_blocking(move || {
        let mut pipeline = pipeline.lock().unwrap_or_else(PoisonError::into_inner);
        let retrieval = pipeline.retrieve(&message)?;
        // recorded before extraction; survives an extractor failure
        conversations.set(&session, retrieval.section.content.clone());
        pipeline.answer_from(&message, retrieval)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("pipeline task failed: {e}")))??;

    Ok(Json(ChatResponse {
        response: outcome.response,
    }))
}

async fn more_detail(State(state): State<AppState>, headers: HeaderMap) -> Json<ChatResponse> {
    Json(ChatResponse {
        response: state.conversations.get(&session_id(&headers)),
    })
}

fn session_id(headers: &HeaderMap) -> String {
    headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_SESSION)
        .to_string()
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn test_session_id_defaults() {
        assert_eq!(session_id(&HeaderMap::new()), DEFAULT_SESSION);

        let mut headers = HeaderMap::new();
        headers.insert(SESSION_HEADER, HeaderValue::from_static("  "));
        assert_eq!(session_id(&headers), DEFAULT_SESSION);
    }

    #[test]
    fn test_session_id_from_header() {
        let mut headers = HeaderMap::new();
        headers.insert(SESSION_HEADER, HeaderValue::from_static("abc-123"));

        assert_eq!(session_id(&headers), "abc-123");
    }

    #[test]
    fn test_missing_message_is_bad_request() {
        let response = ApiError::MissingMessage.into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_pipeline_error_is_server_error() {
        let response = ApiError::from(Error::ExtractionFailed("boom".to_string())).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
