//! Research/main context classification and path rewriting.
//!
//! The site serves two content sets from one deployment. Requests are
//! classified, in order of precedence, by:
//! 1. an explicit `?subdomain=research|main` override,
//! 2. a `research.` host prefix,
//! 3. on loopback hosts, a `/research` path prefix.
//!
//! On the research subdomain, bare `/` and `/{id}` are rewritten to
//! `/research` and `/research/{id}`, and `/research/...` redirects back to the
//! short form. The result is written to the `x-site-context` request header
//! and inserted as a `SiteContext` extension for downstream handlers.

use axum::body::Body;
use axum::extract::{OriginalUri, Request, State};
use axum::http::header::HOST;
use axum::http::{HeaderValue, StatusCode, Uri};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use serde::Serialize;

use crate::state::AppState;

pub const CONTEXT_HEADER: &str = "x-site-context";
const OVERRIDE_PARAM: &str = "subdomain";
const RESEARCH_PREFIX: &str = "/research";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SiteContext {
    Research,
    Main,
}

impl SiteContext {
    pub fn as_str(&self) -> &'static str {
        match self {
            SiteContext::Research => "research",
            SiteContext::Main => "main",
        }
    }

    pub fn from_header(value: Option<&HeaderValue>) -> Self {
        match value.and_then(|v| v.to_str().ok()) {
            Some("research") => SiteContext::Research,
            _ => SiteContext::Main,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteAction {
    Continue,
    /// Serve a different internal path; the browser URL is unchanged.
    Rewrite(String),
    /// Send the browser to a different path on the same host.
    Redirect(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDecision {
    pub context: SiteContext,
    pub action: RouteAction,
}

/// Classify a request and decide how its path is served.
///
/// `host` may include a port. `query` is the raw query string without `?`.
pub fn route(host: &str, path: &str, query: Option<&str>, research_subdomain: &str) -> RouteDecision {
    let hostname = strip_port(host).to_ascii_lowercase();

    match override_param(query) {
        Some(SiteContext::Main) => {
            return RouteDecision {
                context: SiteContext::Main,
                action: RouteAction::Continue,
            }
        }
        Some(SiteContext::Research) => {
            return RouteDecision {
                context: SiteContext::Research,
                action: research_rewrite(path).map_or(RouteAction::Continue, RouteAction::Rewrite),
            }
        }
        None => {}
    }

    let subdomain_prefix = format!("{}.", research_subdomain.to_ascii_lowercase());
    if hostname.starts_with(&subdomain_prefix) {
        if let Some(short) = strip_research_prefix(path) {
            return RouteDecision {
                context: SiteContext::Research,
                action: RouteAction::Redirect(with_query(&short, query)),
            };
        }
        return RouteDecision {
            context: SiteContext::Research,
            action: research_rewrite(path).map_or(RouteAction::Continue, RouteAction::Rewrite),
        };
    }

    if is_loopback(&hostname) && strip_research_prefix(path).is_some() {
        return RouteDecision {
            context: SiteContext::Research,
            action: RouteAction::Continue,
        };
    }

    RouteDecision {
        context: SiteContext::Main,
        action: RouteAction::Continue,
    }
}

/// Middleware applying [`route`] to every request.
pub async fn site_context(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let host = req
        .headers()
        .get(HOST)
        .and_then(|v| v.to_str().ok())
        .or_else(|| req.uri().host())
        .unwrap_or_default()
        .to_string();

    let decision = route(
        &host,
        req.uri().path(),
        req.uri().query(),
        &state.config.site.research_subdomain,
    );

    match decision.action {
        RouteAction::Redirect(location) => {
            tracing::debug!("Redirecting {} to {location}", req.uri());
            return Redirect::permanent(&location).into_response();
        }
        RouteAction::Rewrite(path) => {
            let rewritten = with_query(&path, req.uri().query());
            match rewritten.parse::<Uri>() {
                Ok(uri) => {
                    tracing::debug!("Rewriting {} to {uri}", req.uri());
                    let original = OriginalUri(req.uri().clone());
                    req.extensions_mut().insert(original);
                    *req.uri_mut() = uri;
                }
                Err(e) => {
                    tracing::warn!("Failed to rewrite {} to {rewritten}: {e}", req.uri());
                    return (StatusCode::BAD_REQUEST, Body::from("Invalid path")).into_response();
                }
            }
        }
        RouteAction::Continue => {}
    }

    req.headers_mut().insert(
        CONTEXT_HEADER,
        HeaderValue::from_static(decision.context.as_str()),
    );
    req.extensions_mut().insert(decision.context);
    next.run(req).await
}

fn override_param(query: Option<&str>) -> Option<SiteContext> {
    query?
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == OVERRIDE_PARAM)
        .and_then(|(_, value)| match value.to_ascii_lowercase().as_str() {
            "research" => Some(SiteContext::Research),
            "main" => Some(SiteContext::Main),
            _ => None,
        })
}

/// `/` → `/research`, `/{id}` → `/research/{id}`; everything else untouched.
fn research_rewrite(path: &str) -> Option<String> {
    if path == "/" || path.is_empty() {
        return Some(RESEARCH_PREFIX.to_string());
    }
    let segment = path.strip_prefix('/')?.trim_end_matches('/');
    let bare_id = !segment.is_empty()
        && !segment.contains('/')
        && !segment.contains('.')
        && !segment.starts_with('_')
        && segment != "api"
        && segment != "research";
    bare_id.then(|| format!("{RESEARCH_PREFIX}/{segment}"))
}

/// `/research` → `/`, `/research/x` → `/x`; `None` if the path has no such prefix.
fn strip_research_prefix(path: &str) -> Option<String> {
    let rest = path.strip_prefix(RESEARCH_PREFIX)?;
    if rest.is_empty() || rest == "/" {
        Some("/".to_string())
    } else if rest.starts_with('/') {
        Some(rest.to_string())
    } else {
        // "/researcher" is not under the prefix.
        None
    }
}

fn with_query(path: &str, query: Option<&str>) -> String {
    match query {
        Some(q) if !q.is_empty() => format!("{path}?{q}"),
        _ => path.to_string(),
    }
}

fn strip_port(host: &str) -> &str {
    if let Some(rest) = host.strip_prefix('[') {
        // IPv6 literal: "[::1]:3000"
        return rest.split(']').next().unwrap_or(rest);
    }
    host.split(':').next().unwrap_or(host)
}

fn is_loopback(hostname: &str) -> bool {
    matches!(hostname, "localhost" | "127.0.0.1" | "::1")
}
