use serde_json::Value;

use crate::models::SearchHit;

/// Normalize an index search response into `SearchHit`s.
///
/// Two envelopes are accepted:
///
/// ```text
/// {"result":  {"hits": [{"_id": "..", "_score": 0.8, "fields": {..}}]}}
/// {"results": {"hits": [{"id":  "..", "score":  0.8, "title": .., ..}]}}
/// ```
///
/// A hit may use either layout regardless of the envelope. A body with no
/// hit array is an empty result, not an error.
pub fn parse_hits(body: &Value) -> Vec<SearchHit> {
    let Some(hits) = hit_array(body) else {
        return Vec::new();
    };
    hits.iter().filter(|h| h.is_object()).map(parse_hit).collect()
}

fn hit_array(body: &Value) -> Option<&Vec<Value>> {
    ["result", "results"]
        .iter()
        .find_map(|key| body.get(*key)?.get("hits")?.as_array())
}

fn parse_hit(hit: &Value) -> SearchHit {
    match hit.get("fields") {
        Some(fields) if fields.is_object() => {
            // Nested: record fields live under `fields`, ids and scores are underscored.
            let id = first_str(hit, &["_id", "id"]);
            let score = first_f32(hit, &["_score", "score"]);
            SearchHit::from_fields(id, score, fields)
        }
        _ => {
            // Flat: record fields sit beside the id and score.
            let id = first_str(hit, &["id", "_id"]);
            let score = first_f32(hit, &["score", "_score"]);
            SearchHit::from_fields(id, score, hit)
        }
    }
}

fn first_str<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter().find_map(|k| value.get(*k)?.as_str())
}

fn first_f32(value: &Value, keys: &[&str]) -> Option<f32> {
    keys.iter()
        .find_map(|k| value.get(*k)?.as_f64())
        .map(|v| v as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ContentType;
    use serde_json::json;

    #[test]
    fn test_nested_and_flat_shapes_normalize_identically() {
        let nested = json!({
            "result": {"hits": [{
                "_id": "rec-1",
                "_score": 0.42,
                "fields": {
                    "content_type": "project",
                    "content_id": "qode",
                    "title": "Qode: A Quantum Programming Language",
                    "url": "https://example.com/projects/qode",
                    "technologies": ["Rust", "WASM"],
                    "status": "In Progress"
                }
            }]}
        });
        let flat = json!({
            "results": {"hits": [{
                "id": "rec-1",
                "score": 0.42,
                "content_type": "project",
                "content_id": "qode",
                "title": "Qode: A Quantum Programming Language",
                "url": "https://example.com/projects/qode",
                "technologies": ["Rust", "WASM"],
                "status": "In Progress"
            }]}
        });

        let a = parse_hits(&nested);
        let b = parse_hits(&flat);
        assert_eq!(a.len(), 1);
        assert_eq!(a, b);
        assert_eq!(a[0].content_type, ContentType::Project);
        assert_eq!(a[0].content_id, "qode");
        assert!((a[0].similarity - 0.42).abs() < 1e-6);
        assert_eq!(a[0].metadata.technologies, vec!["Rust", "WASM"]);
    }

    #[test]
    fn test_missing_fields_get_defaults() {
        let body = json!({"result": {"hits": [{"_id": "rec-9", "_score": 0.3, "fields": {}}]}});
        let hits = parse_hits(&body);
        assert_eq!(hits[0].title, "Untitled");
        assert_eq!(hits[0].content_type, ContentType::Unknown);
        assert_eq!(hits[0].content_id, "rec-9");
    }

    #[test]
    fn test_empty_and_missing_hit_arrays() {
        assert!(parse_hits(&json!({"result": {"hits": []}})).is_empty());
        assert!(parse_hits(&json!({"result": {}})).is_empty());
        assert!(parse_hits(&json!({})).is_empty());
        assert!(parse_hits(&json!([])).is_empty());
    }

    #[test]
    fn test_non_object_hits_skipped() {
        let body = json!({"results": {"hits": [1, "x", {"id": "a", "score": 0.5}]}});
        let hits = parse_hits(&body);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].content_id, "a");
    }

    #[test]
    fn test_non_numeric_score_is_zero() {
        let body = json!({"results": {"hits": [{"id": "a", "score": "high"}]}});
        assert_eq!(parse_hits(&body)[0].similarity, 0.0);
    }

    #[test]
    fn test_order_preserved() {
        let body = json!({"result": {"hits": [
            {"_id": "first", "_score": 0.1, "fields": {}},
            {"_id": "second", "_score": 0.9, "fields": {}},
        ]}});
        let ids: Vec<_> = parse_hits(&body).into_iter().map(|h| h.content_id).collect();
        assert_eq!(ids, vec!["first", "second"]);
    }
}
