use serde::{Deserialize, Serialize};

use super::defaults;

/// Retrieval configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    pub keyword_weight: f64,
    pub semantic_weight: f64,
    /// Candidates taken from each channel before hybrid fusion.
    pub candidate_pool: usize,
    pub default_top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            keyword_weight: defaults::DEFAULT_KEYWORD_WEIGHT,
            semantic_weight: defaults::DEFAULT_SEMANTIC_WEIGHT,
            candidate_pool: defaults::DEFAULT_CANDIDATE_POOL,
            default_top_k: defaults::DEFAULT_TOP_K,
        }
    }
}
