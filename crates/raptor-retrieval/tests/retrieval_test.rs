//! Searches over a tree built from the synthetic Treg corpus.

use std::fs;

use raptor_core::config::RaptorConfig;
use raptor_embeddings::EmbeddingEngine;
use raptor_retrieval::comparison::to_csv;
use raptor_retrieval::{
    write_csv, write_json, ComparisonRunner, ComparisonSummary, HitScore, QueryComparison,
    RetrievalEngine, RetrievalIndex, SearchHit, SearchMode, DEFAULT_QUERIES,
};
use raptor_tree::{load_tree, persist_output, RaptorPipeline};

struct Fixture {
    _dir: tempfile::TempDir,
    config: RaptorConfig,
    pipeline: RaptorPipeline,
    index: RetrievalIndex,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let mut config = RaptorConfig::default();
        config.embedding.cache_dir = dir.path().join("cache").display().to_string();
        let pipeline = RaptorPipeline::new(&config).unwrap();
        let output = pipeline.build(test_fixtures::treg_corpus()).unwrap();
        let index = RetrievalIndex::from_tree(&output.tree, pipeline.embeddings()).unwrap();
        Self {
            _dir: dir,
            config,
            pipeline,
            index,
        }
    }

    fn engine(&self) -> RetrievalEngine<'_> {
        self.engine_with_weights(
            self.config.retrieval.keyword_weight,
            self.config.retrieval.semantic_weight,
        )
    }

    fn engine_with_weights(&self, keyword: f64, semantic: f64) -> RetrievalEngine<'_> {
        let mut retrieval = self.config.retrieval.clone();
        retrieval.keyword_weight = keyword;
        retrieval.semantic_weight = semantic;
        RetrievalEngine::new(&self.index, self.pipeline.embeddings(), retrieval)
    }

    fn full_text(&self, node_id: &str) -> String {
        self.index
            .nodes()
            .iter()
            .find(|n| n.node_id == node_id)
            .map(|n| n.text_lower.clone())
            .unwrap()
    }
}

fn ids(hits: &[SearchHit]) -> Vec<&str> {
    hits.iter().map(|h| h.node_id.as_str()).collect()
}

#[test]
fn index_covers_leaves_and_summaries() {
    let fx = Fixture::new();
    assert!(fx.index.len() > 27);
    assert!(fx.index.nodes().iter().any(|n| !n.is_leaf));
    assert_eq!(fx.index.embeddings().len(), fx.index.len());
}

#[test]
fn semantic_search_finds_foxp3_for_transcription_factor_query() {
    let fx = Fixture::new();
    let hits = fx
        .engine()
        .search(SearchMode::Semantic, "Foxp3 transcription factor", 5)
        .unwrap();
    assert_eq!(hits.len(), 5);
    assert!(fx.full_text(&hits[0].node_id).contains("foxp3"));
    assert!(hits.windows(2).all(|w| w[0].score.value() >= w[1].score.value()));
    for hit in &hits {
        assert!(hit.text.chars().count() <= 200);
    }
}

#[test]
fn keyword_search_counts_query_tokens() {
    let fx = Fixture::new();
    let hits = fx.engine().keyword_search("foxp3 tsdr", 5);
    assert!(!hits.is_empty());
    let HitScore::Keyword { score } = hits[0].score else {
        panic!("expected keyword score");
    };
    assert_eq!(score, 2);
    assert!(fx.full_text(&hits[0].node_id).contains("tsdr"));
}

#[test]
fn unknown_token_falls_back_to_semantic_channel() {
    let fx = Fixture::new();
    let engine = fx.engine();

    assert!(engine.search(SearchMode::Keyword, "xyzzy", 5).unwrap().is_empty());
    assert_eq!(engine.search(SearchMode::Semantic, "xyzzy", 5).unwrap().len(), 5);

    let hybrid = engine.search(SearchMode::Hybrid, "xyzzy", 5).unwrap();
    assert_eq!(hybrid.len(), 5);
    for hit in &hybrid {
        let HitScore::Hybrid {
            hybrid,
            keyword_norm,
            semantic,
        } = hit.score
        else {
            panic!("expected hybrid score");
        };
        assert_eq!(keyword_norm, 0.0);
        assert!((hybrid - 0.6 * semantic).abs() < 1e-12);
    }
}

#[test]
fn keyword_only_weights_reproduce_keyword_order() {
    let fx = Fixture::new();
    let query = "regulatory T cells suppression IL-10";
    let keyword = fx.engine().keyword_search(query, 10);
    let hybrid = fx.engine_with_weights(1.0, 0.0).hybrid_search(query, 10).unwrap();
    assert!(!keyword.is_empty());
    assert_eq!(ids(&hybrid)[..keyword.len()], ids(&keyword)[..]);
}

#[test]
fn semantic_only_weights_reproduce_semantic_order() {
    let fx = Fixture::new();
    let query = "thymic selection of CD4 T cells";
    let semantic = fx.engine().semantic_search(query, 10).unwrap();
    let hybrid = fx.engine_with_weights(0.0, 1.0).hybrid_search(query, 10).unwrap();
    assert_eq!(ids(&hybrid), ids(&semantic));
}

#[test]
fn blank_query_returns_nothing_in_every_mode() {
    let fx = Fixture::new();
    let engine = fx.engine();
    for mode in SearchMode::ALL {
        assert!(engine.search(mode, "   ", 5).unwrap().is_empty(), "{mode}");
    }
}

#[test]
fn persisted_tree_indexes_like_the_in_memory_one() {
    let fx = Fixture::new();
    let out = tempfile::tempdir().unwrap();
    let output = fx.pipeline.build(test_fixtures::treg_corpus()).unwrap();
    let paths = persist_output(&output, out.path(), "test").unwrap();

    let persisted = load_tree(&paths.tree).unwrap();
    let engine = EmbeddingEngine::new(fx.config.embedding.clone()).unwrap();
    let index = RetrievalIndex::from_persisted(&persisted, &engine).unwrap();
    let node_ids: Vec<&str> = index.nodes().iter().map(|n| n.node_id.as_str()).collect();
    let expected: Vec<&str> = fx.index.nodes().iter().map(|n| n.node_id.as_str()).collect();
    assert_eq!(node_ids, expected);
}

#[test]
fn comparison_report_is_written_as_json_and_csv() {
    let fx = Fixture::new();
    let engine = fx.engine();
    let results = ComparisonRunner::new(&engine).run(&DEFAULT_QUERIES, 5).unwrap();
    assert_eq!(results.len(), DEFAULT_QUERIES.len());
    assert_eq!(results[0].query_id, 1);

    let summary = ComparisonSummary::from_results(&results);
    assert_eq!(summary.queries, 10);
    assert!(summary.semantic.mean >= 0.0);

    let out = tempfile::tempdir().unwrap();
    let json_path = out.path().join("report/comparison.json");
    let csv_path = out.path().join("report/comparison.csv");
    write_json(&json_path, &results).unwrap();
    write_csv(&csv_path, &results).unwrap();

    let reloaded: Vec<QueryComparison> =
        serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(reloaded.len(), results.len());
    assert_eq!(reloaded[3].query, DEFAULT_QUERIES[3]);

    let csv = fs::read_to_string(&csv_path).unwrap();
    let mut lines = csv.lines();
    assert_eq!(
        lines.next().unwrap(),
        "Query_ID,Query,Keyword_Time,Semantic_Time,Hybrid_Time,Keyword_Score,Semantic_Score,Hybrid_Score,Keyword_Top,Semantic_Top,Hybrid_Top"
    );
    assert_eq!(lines.count(), 10);
    assert_csv_matches(&csv, &results);
}

#[test]
fn queries_with_no_hits_report_na() {
    let fx = Fixture::new();
    let engine = fx.engine();
    let results = ComparisonRunner::new(&engine).run(&["xyzzy, plugh"], 5).unwrap();
    let csv = to_csv(&results);
    let row = csv.lines().nth(1).unwrap();
    assert!(row.starts_with("1,\"xyzzy, plugh\","));
    assert!(row.contains(",N/A,"));
}

fn assert_csv_matches(csv: &str, results: &[QueryComparison]) {
    for (line, result) in csv.lines().skip(1).zip(results) {
        assert!(line.starts_with(&format!("{},", result.query_id)));
        assert!(line.ends_with(result.hybrid.top_node()));
    }
}
