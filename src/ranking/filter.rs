use crate::models::SearchHit;

/// Drop hits below `threshold`, sort by descending similarity, keep the top `limit`.
///
/// The sort is stable, so equal scores keep their retrieval order. NaN scores
/// never pass the threshold.
pub fn filter_ranked(mut hits: Vec<SearchHit>, threshold: f32, limit: usize) -> Vec<SearchHit> {
    hits.retain(|h| h.similarity >= threshold);
    hits.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
    hits.truncate(limit);
    hits
}
