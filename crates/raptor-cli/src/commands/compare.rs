use std::path::PathBuf;

use clap::Args;

use raptor_core::config::RaptorConfig;
use raptor_core::errors::RaptorResult;
use raptor_embeddings::EmbeddingEngine;
use raptor_retrieval::{
    write_csv, write_json, ComparisonRunner, ComparisonSummary, RetrievalEngine, RetrievalIndex,
    DEFAULT_QUERIES,
};
use raptor_tree::{load_tree, timestamp_now};

#[derive(Args)]
pub struct CompareArgs {
    /// Persisted tree file
    #[arg(long)]
    pub tree: PathBuf,

    /// Directory for the JSON and CSV reports
    #[arg(long)]
    pub out: PathBuf,

    #[arg(long, default_value_t = 5)]
    pub top_k: usize,
}

pub fn run(args: CompareArgs, config: &RaptorConfig) -> RaptorResult<()> {
    let tree = load_tree(&args.tree)?;
    let embeddings = EmbeddingEngine::new(config.embedding.clone())?;
    let index = RetrievalIndex::from_persisted(&tree, &embeddings)?;
    let engine = RetrievalEngine::new(&index, &embeddings, config.retrieval.clone());

    let results = ComparisonRunner::new(&engine).run(&DEFAULT_QUERIES, args.top_k)?;
    let summary = ComparisonSummary::from_results(&results);

    let stem = format!("semantic_search_comparison_{}", timestamp_now());
    let json_path = args.out.join(format!("{stem}.json"));
    let csv_path = args.out.join(format!("{stem}.csv"));
    write_json(&json_path, &results)?;
    write_csv(&csv_path, &results)?;

    println!("mean search time over {} queries:", summary.queries);
    for (name, stats) in [
        ("keyword", summary.keyword),
        ("semantic", summary.semantic),
        ("hybrid", summary.hybrid),
    ] {
        println!("  {name:<8} {:.4}s (± {:.4}s)", stats.mean, stats.std);
    }
    for r in &results {
        println!(
            "  Q{}: keyword={:.2} semantic={:.4} hybrid={:.4}",
            r.query_id, r.keyword.top_score, r.semantic.top_score, r.hybrid.top_score
        );
    }
    println!("json -> {}", json_path.display());
    println!("csv  -> {}", csv_path.display());
    Ok(())
}
