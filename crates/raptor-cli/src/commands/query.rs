use std::path::PathBuf;

use clap::Args;

use raptor_core::config::RaptorConfig;
use raptor_core::errors::RaptorResult;
use raptor_embeddings::EmbeddingEngine;
use raptor_retrieval::{RetrievalEngine, RetrievalIndex, SearchMode};
use raptor_tree::load_tree;

#[derive(Args)]
pub struct QueryArgs {
    /// Persisted tree file
    #[arg(long)]
    pub tree: PathBuf,

    /// keyword, semantic or hybrid
    #[arg(long, default_value = "hybrid")]
    pub mode: SearchMode,

    /// Number of hits; defaults to the configured top-k
    #[arg(long)]
    pub top_k: Option<usize>,

    /// Print hits as JSON
    #[arg(long)]
    pub json: bool,

    pub query: String,
}

pub fn run(args: QueryArgs, config: &RaptorConfig) -> RaptorResult<()> {
    let tree = load_tree(&args.tree)?;
    let embeddings = EmbeddingEngine::new(config.embedding.clone())?;
    let index = RetrievalIndex::from_persisted(&tree, &embeddings)?;
    let engine = RetrievalEngine::new(&index, &embeddings, config.retrieval.clone());

    let top_k = args.top_k.unwrap_or(config.retrieval.default_top_k);
    let hits = engine.search(args.mode, &args.query, top_k)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&hits)?);
        return Ok(());
    }
    if hits.is_empty() {
        println!("no results");
    }
    for (rank, hit) in hits.iter().enumerate() {
        let kind = if hit.is_leaf { "leaf" } else { "summary" };
        println!(
            "{:>2}. {} [level {}, {kind}] {:.4}",
            rank + 1,
            hit.node_id,
            hit.level,
            hit.score.value()
        );
        println!("    {}", hit.text.replace('\n', " "));
    }
    Ok(())
}
