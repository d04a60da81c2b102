//! Axum HTTP handlers and router assembly.

pub mod search;
pub mod site;

use axum::extract::Request;
use axum::routing::{get, post};
use axum::{middleware, Router, ServiceExt};
use tokio::net::TcpListener;
use tower::Layer;

use crate::routing::site_context;
use crate::state::AppState;

/// Route table without the subdomain layer.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/search", post(search::search))
        .route("/api/health", get(site::health))
        .route("/api/context", get(site::context))
        .fallback(site::not_found)
        .with_state(state)
}

/// Serve the full application on `listener`.
///
/// The subdomain layer wraps the router instead of being added with
/// `Router::layer`, so path rewrites happen before route matching.
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    let layer = middleware::from_fn_with_state(state.clone(), site_context);
    let app = layer.layer(router(state));
    axum::serve(listener, ServiceExt::<Request>::into_make_service(app)).await
}
