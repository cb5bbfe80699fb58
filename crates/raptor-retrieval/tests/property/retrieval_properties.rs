//! Property tests: bounds and ordering of hybrid scores.

use proptest::prelude::*;

use raptor_core::config::{EmbeddingConfig, RetrievalConfig};
use raptor_embeddings::EmbeddingEngine;
use raptor_retrieval::{HitScore, IndexedNode, RetrievalEngine, RetrievalIndex, SearchMode};

const WORDS: [&str; 12] = [
    "foxp3", "treg", "cd25", "il-10", "thymus", "stem", "marrow", "tgf-beta", "suppression",
    "ctla-4", "cd127", "tsdr",
];

fn word() -> impl Strategy<Value = &'static str> {
    prop::sample::select(WORDS.to_vec())
}

fn text() -> impl Strategy<Value = String> {
    prop::collection::vec(word(), 1..12).prop_map(|w| w.join(" "))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn hybrid_scores_are_bounded_and_non_increasing(
        texts in prop::collection::vec(text(), 1..30),
        query in prop::collection::vec(word(), 1..4),
        keyword_weight in 0.0f64..1.0,
        semantic_weight in 0.0f64..1.0,
        candidate_pool in 1usize..40,
        top_k in 1usize..40,
    ) {
        let dir = tempfile::tempdir().unwrap();
        let config = EmbeddingConfig {
            cache_dir: dir.path().display().to_string(),
            ..Default::default()
        };
        let embeddings = EmbeddingEngine::new(config).unwrap();

        let nodes: Vec<IndexedNode> = texts
            .iter()
            .enumerate()
            .map(|(i, t)| IndexedNode::new(&format!("doc_{i}"), 1, true, t))
            .collect();
        let vectors = embeddings.embed_many(&texts).unwrap();
        let index = RetrievalIndex::new(nodes, vectors, "prop".to_string()).unwrap();

        let retrieval = RetrievalConfig {
            keyword_weight,
            semantic_weight,
            candidate_pool,
            ..Default::default()
        };
        let engine = RetrievalEngine::new(&index, &embeddings, retrieval);
        let hits = engine.search(SearchMode::Hybrid, &query.join(" "), top_k).unwrap();

        prop_assert!(hits.len() <= top_k);
        let upper = keyword_weight + semantic_weight + 1e-6;
        for hit in &hits {
            let HitScore::Hybrid { hybrid, keyword_norm, semantic } = hit.score else {
                return Err(TestCaseError::fail("non-hybrid score"));
            };
            prop_assert!(hybrid >= -1e-9);
            prop_assert!(hybrid <= upper);
            prop_assert!((0.0..=1.0).contains(&keyword_norm));
            prop_assert!(semantic >= -1e-9);
        }
        prop_assert!(hits.windows(2).all(|w| w[0].score.value() >= w[1].score.value()));
    }

    #[test]
    fn keyword_hits_contain_a_query_token(
        texts in prop::collection::vec(text(), 1..30),
        query in prop::collection::vec(word(), 1..4),
    ) {
        let nodes: Vec<IndexedNode> = texts
            .iter()
            .enumerate()
            .map(|(i, t)| IndexedNode::new(&format!("doc_{i}"), 1, true, t))
            .collect();
        let scored = raptor_retrieval::search::keyword_scores(&nodes, &query.join(" "));
        for (pos, score) in &scored {
            prop_assert!(*score >= 1);
            prop_assert!(query.iter().any(|w| nodes[*pos].text_lower.contains(w)));
        }
        prop_assert!(scored.windows(2).all(|w| w[0].1 >= w[1].1));
    }
}
