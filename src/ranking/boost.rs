use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::models::{ContentType, SearchHit};

/// Additive score adjustments applied after retrieval.
///
/// Rules are evaluated per hit in a fixed order:
/// 1. Title match: the query words appear as a contiguous run of whole words
///    in the title, or the title words appear that way in the query.
/// 2. Keyword overlap: distinct query terms found in the title, keywords or
///    technologies, `keyword_per_term` each, capped at `keyword_max`.
/// 3. Content-type affinity: query mentions paper-ish or project-ish terms.
/// 4. Status affinity: query asks for current work and the hit is in progress.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoostWeights {
    pub title_match: f32,
    pub keyword_per_term: f32,
    pub keyword_max: f32,
    pub type_affinity: f32,
    pub status_affinity: f32,
}

impl Default for BoostWeights {
    fn default() -> Self {
        Self {
            title_match: 0.30,
            keyword_per_term: 0.05,
            keyword_max: 0.20,
            type_affinity: 0.15,
            status_affinity: 0.05,
        }
    }
}

impl BoostWeights {
    /// Replace negative or non-finite weights with zero.
    pub fn clamped(&self) -> Self {
        let fix = |w: f32| if w.is_finite() { w.max(0.0) } else { 0.0 };
        Self {
            title_match: fix(self.title_match),
            keyword_per_term: fix(self.keyword_per_term),
            keyword_max: fix(self.keyword_max),
            type_affinity: fix(self.type_affinity),
            status_affinity: fix(self.status_affinity),
        }
    }
}

const STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "about", "by", "for", "from", "i", "in", "is", "it", "me", "my",
    "of", "on", "or", "show", "the", "to", "what", "with",
];

const PAPER_TERMS: &[&str] = &[
    "paper", "papers", "research", "publication", "publications", "published", "study",
    "thesis", "article", "journal",
];

const PROJECT_TERMS: &[&str] = &[
    "project", "projects", "built", "build", "demo", "app", "tool", "repo", "code",
];

const CURRENT_TERMS: &[&str] = &["current", "currently", "latest", "ongoing", "active", "now"];

const IN_PROGRESS_STATUSES: &[&str] = &["in progress", "in-progress", "ongoing", "active", "current"];

/// Lowercase, split on whitespace, strip surrounding punctuation, drop stopwords.
/// Order of first appearance is preserved and duplicates removed.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    text.split_whitespace()
        .map(|t| {
            t.trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .filter(|t| !t.is_empty() && !STOPWORDS.contains(&t.as_str()))
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

/// Lowercased words with surrounding punctuation stripped. Stopwords and
/// duplicates are kept so phrases can be compared word by word.
fn words(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|t| t.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

/// True when `needle` appears as a contiguous run of whole words in `haystack`.
fn contains_phrase(haystack: &[String], needle: &[String]) -> bool {
    !needle.is_empty()
        && needle.len() <= haystack.len()
        && haystack.windows(needle.len()).any(|w| w == needle)
}

/// Pre-processed query shared across every hit.
struct QueryTerms {
    normalized: String,
    words: Vec<String>,
    tokens: Vec<String>,
    type_affinity: Option<ContentType>,
    wants_current: bool,
}

impl QueryTerms {
    fn new(query: &str) -> Self {
        let normalized = normalize_phrase(query);
        let words = words(query);
        let tokens = tokenize(query);

        let mentions = |terms: &[&str]| tokens.iter().any(|t| terms.contains(&t.as_str()));
        // Paper terms win when both appear: "research projects" reads as research.
        let type_affinity = if mentions(PAPER_TERMS) {
            Some(ContentType::Paper)
        } else if mentions(PROJECT_TERMS) {
            Some(ContentType::Project)
        } else {
            None
        };
        let wants_current = mentions(CURRENT_TERMS) || normalized.contains("in progress");

        Self {
            normalized,
            words,
            tokens,
            type_affinity,
            wants_current,
        }
    }
}

/// Raise each hit's `similarity` by the sum of its matching rules.
///
/// Only `similarity` is written; order and length of `hits` are unchanged.
/// Hits that match no rule keep their score bit-for-bit.
pub fn apply_boosting(query: &str, hits: &mut [SearchHit], weights: &BoostWeights) {
    let weights = weights.clamped();
    let terms = QueryTerms::new(query);
    if terms.normalized.is_empty() {
        return;
    }

    for hit in hits.iter_mut() {
        let boost = boost_for(&terms, hit, &weights);
        if boost > 0.0 {
            hit.similarity = (hit.similarity + boost).max(0.0);
        }
    }
}

fn boost_for(terms: &QueryTerms, hit: &SearchHit, weights: &BoostWeights) -> f32 {
    let mut boost = 0.0f32;

    // ── Rule 1: title match ──────────────────────────────
    let title = words(&hit.title);
    if contains_phrase(&title, &terms.words) || contains_phrase(&terms.words, &title) {
        boost += weights.title_match;
    }

    // ── Rule 2: keyword overlap ──────────────────────────
    let mut vocabulary: HashSet<String> = tokenize(&hit.title).into_iter().collect();
    for entry in hit.metadata.keywords.iter().chain(&hit.metadata.technologies) {
        vocabulary.extend(tokenize(entry));
    }
    let overlap = terms
        .tokens
        .iter()
        .filter(|t| vocabulary.contains(*t))
        .count();
    if overlap > 0 {
        boost += (overlap as f32 * weights.keyword_per_term).min(weights.keyword_max);
    }

    // ── Rule 3: content-type affinity ────────────────────
    if terms.type_affinity == Some(hit.content_type) {
        boost += weights.type_affinity;
    }

    // ── Rule 4: status affinity ──────────────────────────
    if terms.wants_current {
        let in_progress = hit.metadata.status.as_deref().is_some_and(|s| {
            let s = normalize_phrase(s);
            IN_PROGRESS_STATUSES.contains(&s.as_str())
        });
        if in_progress {
            boost += weights.status_affinity;
        }
    }

    boost
}

/// Lowercase and collapse runs of whitespace.
fn normalize_phrase(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
