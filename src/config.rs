use serde::{Deserialize, Serialize};

use crate::ranking::boost::BoostWeights;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address
    pub bind_addr: String,
    /// Semantic index (Pinecone) connection settings
    pub index: IndexConfig,
    /// Boosting weights and result filtering
    pub ranking: RankingConfig,
    /// Subdomain routing and URL presentation
    pub site: SiteConfig,
}

/// Connection settings for the hosted semantic index.
///
/// `api_key` and `host` have no defaults: when either is missing the search
/// endpoint refuses requests instead of calling out with a guessed credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Index data-plane host, e.g. "https://portfolio-abc123.svc.pinecone.io".
    pub host: Option<String>,
    /// API key sent as the `Api-Key` header. Never serialized back out.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Record namespace searched by the endpoint.
    pub namespace: String,
    /// Value of the `X-Pinecone-API-Version` header.
    pub api_version: String,
    /// Number of candidates requested from the index (capped at 100).
    pub top_k: usize,
    /// Request timeout in seconds (capped at 30).
    pub timeout_secs: u64,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            host: None,
            api_key: None,
            namespace: "__default__".to_string(),
            api_version: "2025-04".to_string(),
            top_k: 10,
            timeout_secs: 10,
        }
    }
}

impl IndexConfig {
    /// True when both the host and the credential are present.
    pub fn is_configured(&self) -> bool {
        matches!(
            (self.host.as_deref(), self.api_key.as_deref()),
            (Some(h), Some(k)) if !h.trim().is_empty() && !k.trim().is_empty()
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingConfig {
    /// Hits scoring below this after boosting are dropped.
    pub similarity_threshold: f32,
    /// Maximum number of results returned.
    pub result_limit: usize,
    pub weights: BoostWeights,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.1,
            result_limit: 5,
            weights: BoostWeights::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Host label that selects the research context ("research" → research.example.com).
    pub research_subdomain: String,
    /// Public origin stored in index records, e.g. "https://example.com".
    pub canonical_origin: Option<String>,
    /// Origin substituted for `canonical_origin` in result URLs during local development.
    pub local_origin: Option<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            research_subdomain: "research".to_string(),
            canonical_origin: None,
            local_origin: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
            index: IndexConfig::default(),
            ranking: RankingConfig::default(),
            site: SiteConfig::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. `from_env` passes the
    /// process environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(addr) = lookup("PORTFOLIO_BIND_ADDR") {
            config.bind_addr = addr;
        }

        // Index
        if let Some(key) = lookup("PINECONE_API_KEY").filter(|k| !k.trim().is_empty()) {
            config.index.api_key = Some(key);
        }
        if let Some(host) = lookup("PINECONE_INDEX_HOST").filter(|h| !h.trim().is_empty()) {
            config.index.host = Some(host);
        }
        if let Some(ns) = lookup("PINECONE_NAMESPACE") {
            config.index.namespace = ns;
        }
        if let Some(version) = lookup("PINECONE_API_VERSION") {
            config.index.api_version = version;
        }
        if let Some(v) = parse_var::<usize>(&lookup, "PINECONE_TOP_K") {
            config.index.top_k = v.clamp(1, 100);
        }
        if let Some(v) = parse_var::<u64>(&lookup, "PINECONE_TIMEOUT_SECS") {
            config.index.timeout_secs = v.min(30);
        }

        // Ranking
        // NaN would drop every hit; a zero limit would return nothing.
        if let Some(v) =
            parse_var::<f32>(&lookup, "SEARCH_SIMILARITY_THRESHOLD").filter(|v| v.is_finite())
        {
            config.ranking.similarity_threshold = v;
        }
        if let Some(v) = parse_var::<usize>(&lookup, "SEARCH_RESULT_LIMIT") {
            config.ranking.result_limit = v.max(1);
        }
        let weights = &mut config.ranking.weights;
        if let Some(v) = parse_var::<f32>(&lookup, "SEARCH_BOOST_TITLE_MATCH") {
            weights.title_match = v;
        }
        if let Some(v) = parse_var::<f32>(&lookup, "SEARCH_BOOST_KEYWORD_PER_TERM") {
            weights.keyword_per_term = v;
        }
        if let Some(v) = parse_var::<f32>(&lookup, "SEARCH_BOOST_KEYWORD_MAX") {
            weights.keyword_max = v;
        }
        if let Some(v) = parse_var::<f32>(&lookup, "SEARCH_BOOST_TYPE_AFFINITY") {
            weights.type_affinity = v;
        }
        if let Some(v) = parse_var::<f32>(&lookup, "SEARCH_BOOST_STATUS_AFFINITY") {
            weights.status_affinity = v;
        }
        *weights = weights.clamped();

        // Site
        if let Some(sub) = lookup("SITE_RESEARCH_SUBDOMAIN").filter(|s| !s.is_empty()) {
            config.site.research_subdomain = sub;
        }
        if let Some(origin) = lookup("SITE_CANONICAL_ORIGIN") {
            config.site.canonical_origin = Some(origin.trim_end_matches('/').to_string());
        }
        if let Some(origin) = lookup("SITE_LOCAL_ORIGIN") {
            config.site.local_origin = Some(origin.trim_end_matches('/').to_string());
        }

        config
    }
}

fn parse_var<T: std::str::FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_without_env() {
        let config = config_from(&[]);
        assert_eq!(config.bind_addr, "127.0.0.1:3000");
        assert!(!config.index.is_configured());
        assert_eq!(config.ranking.result_limit, 5);
        assert!((config.ranking.similarity_threshold - 0.1).abs() < f32::EPSILON);
        assert_eq!(config.site.research_subdomain, "research");
    }

    #[test]
    fn test_index_requires_key_and_host() {
        let only_key = config_from(&[("PINECONE_API_KEY", "pc-123")]);
        assert!(!only_key.index.is_configured());

        let blank_key = config_from(&[
            ("PINECONE_API_KEY", "  "),
            ("PINECONE_INDEX_HOST", "https://idx.example"),
        ]);
        assert!(!blank_key.index.is_configured());

        let both = config_from(&[
            ("PINECONE_API_KEY", "pc-123"),
            ("PINECONE_INDEX_HOST", "https://idx.example"),
        ]);
        assert!(both.index.is_configured());
    }

    #[test]
    fn test_numeric_caps_and_bad_values() {
        let config = config_from(&[
            ("PINECONE_TOP_K", "5000"),
            ("PINECONE_TIMEOUT_SECS", "120"),
            ("SEARCH_RESULT_LIMIT", "not-a-number"),
        ]);
        assert_eq!(config.index.top_k, 100);
        assert_eq!(config.index.timeout_secs, 30);
        assert_eq!(config.ranking.result_limit, 5);
    }

    #[test]
    fn test_degenerate_ranking_overrides_rejected() {
        let config = config_from(&[
            ("SEARCH_SIMILARITY_THRESHOLD", "NaN"),
            ("SEARCH_RESULT_LIMIT", "0"),
        ]);
        assert!((config.ranking.similarity_threshold - 0.1).abs() < f32::EPSILON);
        assert_eq!(config.ranking.result_limit, 1);

        let config = config_from(&[("SEARCH_SIMILARITY_THRESHOLD", "inf")]);
        assert!((config.ranking.similarity_threshold - 0.1).abs() < f32::EPSILON);

        let config = config_from(&[("SEARCH_SIMILARITY_THRESHOLD", "0.25")]);
        assert!((config.ranking.similarity_threshold - 0.25).abs() < f32::EPSILON);
    }

    #[test]
    fn test_negative_boost_weights_clamped() {
        let config = config_from(&[
            ("SEARCH_BOOST_TITLE_MATCH", "-1.0"),
            ("SEARCH_BOOST_TYPE_AFFINITY", "0.4"),
        ]);
        assert_eq!(config.ranking.weights.title_match, 0.0);
        assert!((config.ranking.weights.type_affinity - 0.4).abs() < f32::EPSILON);
    }

    #[test]
    fn test_api_key_not_serialized() {
        let config = config_from(&[("PINECONE_API_KEY", "secret-value")]);
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret-value"));
    }

    #[test]
    fn test_origins_trailing_slash_trimmed() {
        let config = config_from(&[
            ("SITE_CANONICAL_ORIGIN", "https://example.com/"),
            ("SITE_LOCAL_ORIGIN", "http://localhost:3000/"),
        ]);
        assert_eq!(config.site.canonical_origin.as_deref(), Some("https://example.com"));
        assert_eq!(config.site.local_origin.as_deref(), Some("http://localhost:3000"));
    }
}
