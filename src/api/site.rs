use axum::extract::{OriginalUri, State};
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::Json;
use serde_json::{json, Value};

use crate::routing::{SiteContext, CONTEXT_HEADER};
use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "search_configured": state.index.is_some(),
    }))
}

/// GET /api/context - The presentation context the renderer would receive.
pub async fn context(headers: HeaderMap) -> Json<Value> {
    let context = SiteContext::from_header(headers.get(CONTEXT_HEADER));
    Json(json!({ "context": context }))
}

/// Fallback for paths with no handler. Reports the path as served (after
/// any rewrite) so routing can be checked from outside.
pub async fn not_found(
    uri: Uri,
    OriginalUri(original): OriginalUri,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    let context = SiteContext::from_header(headers.get(CONTEXT_HEADER));
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Not found",
            "path": uri.path(),
            "requested_path": original.path(),
            "context": context,
        })),
    )
}
