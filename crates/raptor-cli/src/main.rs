//! `raptor`: build and search Treg RAPTOR trees.
//!
//! - `fetch`: collect a literature corpus from PubMed
//! - `build`: classify, embed, cluster and persist a tree
//! - `query`: search a persisted tree in one mode
//! - `compare`: time all three modes over the default questions
//!
//! Exit code 0 on success, 1 on error.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use raptor_core::config::RaptorConfig;
use raptor_core::errors::RaptorResult;

mod commands;
mod logging;

#[derive(Parser)]
#[command(name = "raptor", version, about = "Treg differentiation RAPTOR index")]
#[command(propagate_version = true)]
struct Cli {
    /// TOML configuration file; missing keys take their defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbosity (-v info, -vv debug, -vvv trace). `RAPTOR_LOG` wins when set.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Collect PubMed abstracts for every stage into a corpus directory
    Fetch(commands::fetch::FetchArgs),
    /// Build a tree over a corpus directory and write it to disk
    Build(commands::build::BuildArgs),
    /// Search a persisted tree
    Query(commands::query::QueryArgs),
    /// Run the default questions through all search modes
    Compare(commands::compare::CompareArgs),
}

fn load_config(path: Option<&PathBuf>) -> RaptorResult<RaptorConfig> {
    match path {
        Some(path) => RaptorConfig::from_file(path),
        None => Ok(RaptorConfig::default()),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_ref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    logging::init(&config.observability, cli.verbose);

    let result = match cli.command {
        Commands::Fetch(args) => commands::fetch::run(args, &config),
        Commands::Build(args) => commands::build::run(args, &config),
        Commands::Query(args) => commands::query::run(args, &config),
        Commands::Compare(args) => commands::compare::run(args, &config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(stage = ?e.stage(), error = %e, "command failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn query_parses_mode_and_defaults() {
        let cli = Cli::try_parse_from([
            "raptor", "query", "--tree", "t.json", "--mode", "semantic", "Foxp3 function",
        ])
        .unwrap();
        let Commands::Query(args) = cli.command else {
            panic!("expected query");
        };
        assert_eq!(args.mode, raptor_retrieval::SearchMode::Semantic);
        assert_eq!(args.top_k, None);
        assert_eq!(args.query, "Foxp3 function");
    }

    #[test]
    fn unknown_mode_is_rejected() {
        let args = ["raptor", "query", "--tree", "t", "--mode", "fuzzy", "q"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    fn files_starting_with(dir: &std::path::Path, prefix: &str) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().path())
            .filter(|p| p.file_name().unwrap().to_string_lossy().starts_with(prefix))
            .collect();
        files.sort();
        files
    }

    #[test]
    fn build_then_query_and_compare_over_a_corpus_dir() {
        let dir = tempfile::tempdir().unwrap();
        let corpus = dir.path().join("corpus");
        let out = dir.path().join("out");
        std::fs::create_dir_all(&corpus).unwrap();
        let json = serde_json::to_string(&test_fixtures::treg_corpus()).unwrap();
        std::fs::write(corpus.join("treg.json"), json).unwrap();
        std::fs::write(corpus.join("root.txt"), "Thymic Treg development needs AIRE.").unwrap();

        let mut config = RaptorConfig::default();
        config.embedding.cache_dir = dir.path().join("cache").display().to_string();

        let (corpus_arg, out_arg) = (corpus.to_str().unwrap(), out.to_str().unwrap());
        let cli = Cli::try_parse_from([
            "raptor", "build", "--corpus", corpus_arg, "--out", out_arg, "--scale", "test",
        ])
        .unwrap();
        let Commands::Build(args) = cli.command else {
            panic!("expected build");
        };
        commands::build::run(args, &config).unwrap();

        let trees = files_starting_with(&out, "enhanced_treg_raptor_test_");
        assert_eq!(trees.len(), 1);
        assert_eq!(files_starting_with(&out, "treg_documents_test_").len(), 1);
        let persisted = raptor_tree::load_tree(&trees[0]).unwrap();
        assert_eq!(persisted.total_documents, 28);
        assert!(persisted.tree_nodes["root"].is_leaf);

        let tree_arg = trees[0].to_str().unwrap();
        let cli = Cli::try_parse_from([
            "raptor", "query", "--tree", tree_arg, "--mode", "keyword", "--json", "foxp3",
        ])
        .unwrap();
        let Commands::Query(args) = cli.command else {
            panic!("expected query");
        };
        commands::query::run(args, &config).unwrap();

        let cli = Cli::try_parse_from(["raptor", "compare", "--tree", tree_arg, "--out", out_arg])
            .unwrap();
        let Commands::Compare(args) = cli.command else {
            panic!("expected compare");
        };
        commands::compare::run(args, &config).unwrap();

        let reports = files_starting_with(&out, "semantic_search_comparison_");
        assert_eq!(reports.len(), 2);
        let csv_path = reports
            .iter()
            .find(|p| p.extension().is_some_and(|e| e == "csv"))
            .unwrap();
        assert_eq!(std::fs::read_to_string(csv_path).unwrap().lines().count(), 11);
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let missing = PathBuf::from("/nonexistent/raptor.toml");
        assert!(load_config(Some(&missing)).is_err());
        assert!(load_config(None).is_ok());
    }
}
