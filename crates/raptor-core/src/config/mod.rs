pub mod defaults;
mod embedding_config;
mod ingest_config;
mod intake_config;
mod observability_config;
mod retrieval_config;
mod tree_config;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use embedding_config::EmbeddingConfig;
pub use ingest_config::IngestConfig;
pub use intake_config::IntakeConfig;
pub use observability_config::ObservabilityConfig;
pub use retrieval_config::RetrievalConfig;
pub use tree_config::{TreeConfig, TreeStrategy};

use crate::errors::{RaptorError, RaptorResult};

/// Top-level configuration aggregating all subsystem configs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RaptorConfig {
    pub embedding: EmbeddingConfig,
    pub tree: TreeConfig,
    pub intake: IntakeConfig,
    pub retrieval: RetrievalConfig,
    pub ingest: IngestConfig,
    pub observability: ObservabilityConfig,
}

impl RaptorConfig {
    /// Parse and validate a TOML document. Missing keys take their defaults.
    pub fn from_toml(toml_str: &str) -> RaptorResult<Self> {
        let config: Self = toml::from_str(toml_str).map_err(|e| RaptorError::ConfigError {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file on disk.
    pub fn from_file(path: &Path) -> RaptorResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml(&raw)
    }

    /// Reject configurations the builder or retriever cannot honor.
    pub fn validate(&self) -> RaptorResult<()> {
        let tree = &self.tree;
        if tree.k_min < 2 {
            return Err(config_error("tree.k_min must be at least 2"));
        }
        if tree.k_min > tree.k_max {
            return Err(config_error("tree.k_min must not exceed tree.k_max"));
        }
        if tree.min_split_size < 2 {
            return Err(config_error("tree.min_split_size must be at least 2"));
        }
        if tree.max_cluster_size == 0 {
            return Err(config_error("tree.max_cluster_size must be positive"));
        }
        if tree.summary_max_chars == 0 || tree.content_max_chars == 0 {
            return Err(config_error("tree text bounds must be positive"));
        }
        if tree.source_documents_limit == 0 {
            return Err(config_error("tree.source_documents_limit must be positive"));
        }

        if self.embedding.dimensions == 0 {
            return Err(config_error("embedding.dimensions must be positive"));
        }
        if self.embedding.batch_size == 0 {
            return Err(config_error("embedding.batch_size must be positive"));
        }

        let retrieval = &self.retrieval;
        for (name, weight) in [
            ("keyword_weight", retrieval.keyword_weight),
            ("semantic_weight", retrieval.semantic_weight),
        ] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(config_error(&format!(
                    "retrieval.{name} must be finite and non-negative"
                )));
            }
        }
        if retrieval.keyword_weight == 0.0 && retrieval.semantic_weight == 0.0 {
            return Err(config_error("retrieval weights must not both be zero"));
        }
        if retrieval.candidate_pool == 0 {
            return Err(config_error("retrieval.candidate_pool must be positive"));
        }

        if self.ingest.max_workers == 0 || self.ingest.batch_size == 0 {
            return Err(config_error(
                "ingest.max_workers and ingest.batch_size must be positive",
            ));
        }
        Ok(())
    }
}

fn config_error(reason: &str) -> RaptorError {
    RaptorError::ConfigError {
        reason: reason.to_string(),
    }
}
