use std::path::PathBuf;

use clap::Args;

use raptor_core::config::RaptorConfig;
use raptor_core::errors::{BuildStage, RaptorResult};
use raptor_tree::{load_corpus_dir, RaptorPipeline};

#[derive(Args)]
pub struct BuildArgs {
    /// Directory of `*.json` / `*.txt` corpus files
    #[arg(long)]
    pub corpus: PathBuf,

    /// Output directory for the tree and document metadata
    #[arg(long)]
    pub out: PathBuf,

    /// Label embedded in the output file names
    #[arg(long, default_value = "full")]
    pub scale: String,
}

pub fn run(args: BuildArgs, config: &RaptorConfig) -> RaptorResult<()> {
    let documents = load_corpus_dir(&args.corpus).map_err(|e| e.at_stage(BuildStage::Ingest))?;
    let pipeline = RaptorPipeline::new(config)?;
    let (output, paths) = pipeline.build_and_persist(documents, &args.out, &args.scale)?;

    let tree = &output.tree;
    println!(
        "{} documents, {} nodes, depth {}, {:.2}s",
        output.corpus.len(),
        tree.len(),
        tree.depth(),
        output.build_time_seconds
    );
    if output.corpus.dropped_level_0 > 0 {
        println!("level 0 down-sampled by {}", output.corpus.dropped_level_0);
    }
    for (level, count) in &output.corpus.level_distribution {
        println!("  level {level}: {count}");
    }
    println!("tree      -> {}", paths.tree.display());
    println!("documents -> {}", paths.documents.display());
    Ok(())
}
