//! Post-retrieval ranking: keyword-triggered boosting, then threshold
//! filtering and truncation.

pub mod boost;
pub mod filter;

use crate::config::RankingConfig;
use crate::models::SearchHit;

/// Result of ranking a retrieval response.
#[derive(Debug, Clone, PartialEq)]
pub enum RankOutcome {
    Ranked(Vec<SearchHit>),
    /// Retrieval succeeded but nothing cleared the similarity threshold.
    NoRelevantResults,
}

/// Boost, filter and truncate `hits` for `query`.
pub fn rank(query: &str, mut hits: Vec<SearchHit>, config: &RankingConfig) -> RankOutcome {
    boost::apply_boosting(query, &mut hits, &config.weights);
    let ranked = filter::filter_ranked(hits, config.similarity_threshold, config.result_limit);
    if ranked.is_empty() {
        RankOutcome::NoRelevantResults
    } else {
        RankOutcome::Ranked(ranked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ContentType, HitMetadata};

    fn make_hit(content_type: ContentType, title: &str, similarity: f32) -> SearchHit {
        SearchHit {
            content_type,
            content_id: title.to_string(),
            title: title.to_string(),
            url: String::new(),
            similarity,
            metadata: HitMetadata::default(),
        }
    }

    #[test]
    fn test_boosted_hit_moves_to_top() {
        let hits = vec![
            make_hit(ContentType::Paper, "Sparse Attention Kernels", 0.55),
            make_hit(ContentType::Project, "Trading Engine", 0.50),
            make_hit(ContentType::Project, "Qode: A Quantum Programming Language", 0.42),
        ];
        let RankOutcome::Ranked(ranked) =
            rank("quantum programming language", hits, &RankingConfig::default())
        else {
            panic!("expected results");
        };
        assert_eq!(ranked[0].title, "Qode: A Quantum Programming Language");
        assert!(ranked[0].similarity > 0.42);
    }

    #[test]
    fn test_papers_outrank_projects_for_research_query() {
        let hits = vec![
            make_hit(ContentType::Project, "Trading Engine", 0.3),
            make_hit(ContentType::Paper, "Sparse Attention", 0.3),
            make_hit(ContentType::Project, "Portfolio Site", 0.3),
            make_hit(ContentType::Paper, "Graph Learning", 0.3),
        ];
        let RankOutcome::Ranked(ranked) = rank("research papers", hits, &RankingConfig::default())
        else {
            panic!("expected results");
        };
        let types: Vec<_> = ranked.iter().map(|h| h.content_type).collect();
        assert_eq!(
            types,
            vec![
                ContentType::Paper,
                ContentType::Paper,
                ContentType::Project,
                ContentType::Project
            ]
        );
        assert_eq!(ranked[0].title, "Sparse Attention");
    }

    #[test]
    fn test_empty_retrieval_is_no_relevant_results() {
        assert_eq!(
            rank("anything", vec![], &RankingConfig::default()),
            RankOutcome::NoRelevantResults
        );
    }

    #[test]
    fn test_all_below_floor_is_no_relevant_results() {
        let hits = vec![
            make_hit(ContentType::Unknown, "Marathon", 0.02),
            make_hit(ContentType::Unknown, "Sailing", 0.05),
        ];
        assert_eq!(
            rank("compilers", hits, &RankingConfig::default()),
            RankOutcome::NoRelevantResults
        );
    }

    #[test]
    fn test_limit_applied() {
        let hits: Vec<_> = (0..12)
            .map(|i| make_hit(ContentType::Project, &format!("p{i}"), 0.5))
            .collect();
        let RankOutcome::Ranked(ranked) = rank("zzz", hits, &RankingConfig::default()) else {
            panic!("expected results");
        };
        assert_eq!(ranked.len(), 5);
        assert_eq!(ranked[0].title, "p0");
    }
}
