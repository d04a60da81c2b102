use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde_json::Value;

use crate::config::SiteConfig;
use crate::error::SearchError;
use crate::models::{SearchHit, SearchRequest, SearchResponse};
use crate::ranking::{rank, RankOutcome};
use crate::state::AppState;

pub const NO_RESULTS_MESSAGE: &str = "No relevant results found. Try rephrasing your search.";

/// POST /api/search - Retrieval pipeline:
///   1. Validate the query (non-empty after trimming)
///   2. Retrieve candidates from the semantic index
///   3. Keyword/type/status boosting
///   4. Similarity floor + top-N truncation
pub async fn search(
    State(state): State<AppState>,
    body: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<SearchResponse>, SearchError> {
    let req = match body {
        Ok(Json(req)) => req,
        Err(rejection) => {
            tracing::debug!("Rejected search body: {rejection}");
            return Err(SearchError::InvalidInput);
        }
    };
    let query = validate_query(req.query.as_ref())?;

    let Some(index) = state.index.as_ref() else {
        tracing::error!("Search requested but the index is not configured");
        return Err(SearchError::NotConfigured);
    };

    // ── Step 1: Retrieval ────────────────────────────────
    let hits = match index.search(&query).await {
        Ok(hits) => hits,
        Err(e) if e.is_upstream() => {
            tracing::error!("Search index call failed: {e}");
            return Err(e);
        }
        Err(e) => return Err(e),
    };
    let retrieved = hits.len();

    // ── Step 2: Boost + filter ───────────────────────────
    let outcome = rank(&query, hits, &state.config.ranking);

    match outcome {
        RankOutcome::Ranked(mut results) => {
            tracing::info!(
                "Search for {query:?}: {retrieved} retrieved, {} returned",
                results.len()
            );
            localize_urls(&mut results, &state.config.site);
            Ok(Json(SearchResponse {
                results,
                error: None,
            }))
        }
        RankOutcome::NoRelevantResults => {
            tracing::info!("Search for {query:?}: {retrieved} retrieved, none relevant");
            Ok(Json(SearchResponse {
                results: Vec::new(),
                error: Some(NO_RESULTS_MESSAGE.to_string()),
            }))
        }
    }
}

/// Accept only a JSON string that is non-empty after trimming.
fn validate_query(query: Option<&Value>) -> Result<String, SearchError> {
    match query {
        Some(Value::String(q)) if !q.trim().is_empty() => Ok(q.trim().to_string()),
        _ => Err(SearchError::InvalidInput),
    }
}

/// Swap the canonical origin for the local one in result URLs.
fn localize_urls(hits: &mut [SearchHit], site: &SiteConfig) {
    let (Some(canonical), Some(local)) = (&site.canonical_origin, &site.local_origin) else {
        return;
    };
    for hit in hits {
        if let Some(rest) = hit.url.strip_prefix(canonical.as_str()) {
            if rest.is_empty() || rest.starts_with('/') || rest.starts_with('?') {
                hit.url = format!("{local}{rest}");
            }
        }
    }
}
