//! Retrieval adapter for the hosted semantic index.

pub mod normalize;

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use crate::config::IndexConfig;
use crate::error::SearchError;
use crate::models::SearchHit;

/// Record fields requested from the index.
const RECORD_FIELDS: &[&str] = &[
    "content_type",
    "content_id",
    "title",
    "url",
    "date",
    "institution",
    "company",
    "period",
    "keywords",
    "technologies",
    "status",
    "related_project_id",
    "location",
];

/// Client for the index's integrated-embedding record search.
///
/// Built once at startup and shared through `AppState`.
#[derive(Clone)]
pub struct IndexClient {
    http: reqwest::Client,
    host: String,
    api_key: String,
    namespace: String,
    api_version: String,
    top_k: usize,
}

impl std::fmt::Debug for IndexClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexClient")
            .field("host", &self.host)
            .field("namespace", &self.namespace)
            .field("top_k", &self.top_k)
            .finish_non_exhaustive()
    }
}

impl IndexClient {
    /// Returns `Err(NotConfigured)` when the host or key is missing.
    pub fn from_config(config: &IndexConfig) -> Result<Self, SearchError> {
        let (Some(host), Some(api_key)) = (config.host.as_deref(), config.api_key.as_deref())
        else {
            return Err(SearchError::NotConfigured);
        };
        if !config.is_configured() {
            return Err(SearchError::NotConfigured);
        }

        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(config.timeout_secs.clamp(1, 30)))
            .build()?;

        let host = host.trim().trim_end_matches('/');
        let host = if host.starts_with("http://") || host.starts_with("https://") {
            host.to_string()
        } else {
            format!("https://{host}")
        };

        Ok(Self {
            http,
            host,
            api_key: api_key.to_string(),
            namespace: config.namespace.clone(),
            api_version: config.api_version.clone(),
            top_k: config.top_k.max(1),
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Search the index for `query` and normalize the hits.
    ///
    /// `query` must be non-empty after trimming. An empty hit list is `Ok`.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchHit>, SearchError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(SearchError::InvalidInput);
        }

        let url = format!("{}/records/namespaces/{}/search", self.host, self.namespace);
        let req = SearchRecordsRequest {
            query: RecordQuery {
                inputs: QueryInputs { text: query },
                top_k: self.top_k,
            },
            fields: RECORD_FIELDS,
        };

        let resp = self
            .http
            .post(&url)
            .header("Api-Key", &self.api_key)
            .header("X-Pinecone-API-Version", &self.api_version)
            .json(&req)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            let err = SearchError::upstream(status.as_u16(), &body);
            tracing::warn!("{}", err.details().unwrap_or_default());
            return Err(err);
        }

        let body: Value = resp
            .json()
            .await
            .map_err(|e| SearchError::InvalidUpstreamResponse(e.without_url().to_string()))?;

        let hits = normalize::parse_hits(&body);
        tracing::debug!("Search index returned {} hits", hits.len());
        Ok(hits)
    }

    /// Cheap reachability probe used at startup.
    pub async fn ping(&self) -> bool {
        let url = format!("{}/describe_index_stats", self.host);
        match self
            .http
            .get(&url)
            .header("Api-Key", &self.api_key)
            .header("X-Pinecone-API-Version", &self.api_version)
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                tracing::debug!("Index probe failed: {}", e.without_url());
                false
            }
        }
    }
}

// ─── Request types ─────────────────────────────────────

#[derive(Serialize)]
struct SearchRecordsRequest<'a> {
    query: RecordQuery<'a>,
    fields: &'a [&'a str],
}

#[derive(Serialize)]
struct RecordQuery<'a> {
    inputs: QueryInputs<'a>,
    top_k: usize,
}

#[derive(Serialize)]
struct QueryInputs<'a> {
    text: &'a str,
}
