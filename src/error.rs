//! Search failures and their HTTP mapping.
//!
//! Every variant renders as a JSON object `{"error": ..., "details"?: ..., "hint"?: ...}`:
//! - `InvalidInput` → 400
//! - `NotConfigured` → 500
//! - `Upstream` / `Transport` / `InvalidUpstreamResponse` → 500
//!
//! "No relevant results" is not an error and has no variant here.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// Longest upstream body attached to an error, in bytes.
const MAX_UPSTREAM_BODY: usize = 1_000;

#[derive(Debug, Error)]
pub enum SearchError {
    /// Caller-supplied query failed validation.
    #[error("Query is required and must be a non-empty string")]
    InvalidInput,
    /// Index credentials or host are missing.
    #[error("Search is not configured")]
    NotConfigured,
    /// The index answered with a non-success status.
    #[error("Search index returned {status}")]
    Upstream { status: u16, body: String },
    /// The index could not be reached.
    #[error("Search index unreachable: {0}")]
    Transport(String),
    /// The index answered 2xx with a body that is not JSON.
    #[error("Search index returned an unreadable response: {0}")]
    InvalidUpstreamResponse(String),
}

impl SearchError {
    pub fn upstream(status: u16, body: &str) -> Self {
        SearchError::Upstream {
            status,
            body: truncate_body(body),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            SearchError::InvalidInput => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Operator-facing detail attached to the response body and to log lines.
    /// Upstream bodies are already truncated here.
    pub fn details(&self) -> Option<String> {
        match self {
            SearchError::InvalidInput | SearchError::NotConfigured => None,
            SearchError::Upstream { status, body } => {
                Some(format!("Search index returned {status}: {body}"))
            }
            SearchError::Transport(msg) | SearchError::InvalidUpstreamResponse(msg) => {
                Some(msg.clone())
            }
        }
    }

    /// True for failures on the retrieval side (as opposed to the caller's input
    /// or local configuration).
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            SearchError::Upstream { .. }
                | SearchError::Transport(_)
                | SearchError::InvalidUpstreamResponse(_)
        )
    }
}

impl From<reqwest::Error> for SearchError {
    fn from(e: reqwest::Error) -> Self {
        // Drop the URL: it carries the index host, which is operator-only detail.
        SearchError::Transport(e.without_url().to_string())
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    hint: Option<String>,
}

impl IntoResponse for SearchError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            SearchError::InvalidInput => ErrorBody {
                error: self.to_string(),
                details: None,
                hint: None,
            },
            SearchError::NotConfigured => ErrorBody {
                error: self.to_string(),
                details: None,
                hint: Some("Set PINECONE_API_KEY and PINECONE_INDEX_HOST".to_string()),
            },
            SearchError::Upstream { .. }
            | SearchError::Transport(_)
            | SearchError::InvalidUpstreamResponse(_) => ErrorBody {
                error: "Failed to search content".to_string(),
                details: self.details(),
                hint: Some("The search index may be temporarily unavailable".to_string()),
            },
        };
        (status, Json(body)).into_response()
    }
}

fn truncate_body(body: &str) -> String {
    if body.len() <= MAX_UPSTREAM_BODY {
        return body.to_string();
    }
    let mut end = MAX_UPSTREAM_BODY;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
