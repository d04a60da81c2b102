use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Coarse category of an indexed document.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Paper,
    Project,
    #[default]
    #[serde(other)]
    Unknown,
}

impl ContentType {
    /// Parse the index's free-form tag. Anything unrecognised is `Unknown`.
    pub fn parse(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "paper" => ContentType::Paper,
            "project" => ContentType::Project,
            _ => ContentType::Unknown,
        }
    }
}

/// Optional descriptive fields carried through from the index record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HitMetadata {
    pub date: Option<String>,
    pub institution: Option<String>,
    pub company: Option<String>,
    pub period: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub technologies: Vec<String>,
    pub status: Option<String>,
    pub related_project_id: Option<String>,
    pub location: Option<String>,
}

impl HitMetadata {
    /// Read metadata from an index record's field map. Fields with an
    /// unexpected JSON type are treated as absent.
    pub fn from_fields(fields: &Value) -> Self {
        Self {
            date: string_field(fields, &["date"]),
            institution: string_field(fields, &["institution"]),
            company: string_field(fields, &["company"]),
            period: string_field(fields, &["period"]),
            keywords: list_field(fields, "keywords"),
            technologies: list_field(fields, "technologies"),
            status: string_field(fields, &["status"]),
            related_project_id: string_field(
                fields,
                &["related_project_id", "relatedProjectId"],
            ),
            location: string_field(fields, &["location"]),
        }
    }
}

/// A single retrieval result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchHit {
    pub content_type: ContentType,
    pub content_id: String,
    pub title: String,
    pub url: String,
    pub similarity: f32,
    pub metadata: HitMetadata,
}

impl SearchHit {
    /// Canonical constructor shared by every upstream response shape.
    ///
    /// `hit_id` is the index's own record id and stands in for a missing
    /// `content_id`.
    pub fn from_fields(hit_id: Option<&str>, score: Option<f32>, fields: &Value) -> Self {
        let content_id = string_field(fields, &["content_id", "contentId"])
            .or_else(|| hit_id.map(str::to_string))
            .unwrap_or_default();

        Self {
            content_type: string_field(fields, &["content_type", "contentType"])
                .map(|t| ContentType::parse(&t))
                .unwrap_or_default(),
            content_id,
            title: string_field(fields, &["title"]).unwrap_or_else(|| "Untitled".to_string()),
            url: string_field(fields, &["url"]).unwrap_or_default(),
            similarity: score.filter(|s| s.is_finite()).unwrap_or(0.0),
            metadata: HitMetadata::from_fields(fields),
        }
    }
}

/// Search request body. `query` stays untyped so that a missing or non-string
/// value is reported by the handler's own validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub query: Option<Value>,
}

/// Search response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<SearchHit>,
    /// Advisory message when the search succeeded but nothing was relevant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn string_field(fields: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match fields.get(*key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn list_field(fields: &Value, key: &str) -> Vec<String> {
    match fields.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        Some(Value::String(s)) => s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}
