use std::fs;
use std::path::PathBuf;

use clap::Args;
use tracing::{info, warn};

use raptor_core::config::RaptorConfig;
use raptor_core::errors::{IngestError, RaptorResult};
use raptor_ingest::{articles_to_documents, default_level_queries, LevelCollector, PubMedClient};

/// File written into the corpus directory.
pub const CORPUS_FILE: &str = "pubmed_corpus.json";

#[derive(Args)]
pub struct FetchArgs {
    /// Corpus directory to write `pubmed_corpus.json` into
    #[arg(long)]
    pub out: PathBuf,

    /// Contact address sent to NCBI with every request
    #[arg(long)]
    pub email: Option<String>,

    /// Directory for cached efetch responses
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,
}

pub fn run(args: FetchArgs, config: &RaptorConfig) -> RaptorResult<()> {
    let mut ingest = config.ingest.clone();
    if args.email.is_some() {
        ingest.email = args.email;
    }
    if let Some(dir) = args.cache_dir {
        ingest.cache_dir = dir.display().to_string();
    }

    let client = PubMedClient::new(ingest.clone())?;
    let report = LevelCollector::new(&client, ingest).collect(&default_level_queries())?;
    if report.articles.is_empty() {
        return Err(IngestError::Http {
            reason: "no articles collected".into(),
        }
        .into());
    }
    if !report.is_complete() {
        warn!(per_level = ?report.per_level, "some levels collected no articles");
    }

    let documents = articles_to_documents(&report.articles)?;
    fs::create_dir_all(&args.out)?;
    let path = args.out.join(CORPUS_FILE);
    fs::write(&path, serde_json::to_string_pretty(&documents)?)?;
    info!(path = %path.display(), documents = documents.len(), "corpus written");

    println!("{} documents -> {}", documents.len(), path.display());
    for (level, count) in &report.per_level {
        println!("  level {level}: {count}");
    }
    Ok(())
}
