use serde::{Deserialize, Serialize};

use super::defaults;

/// Tree construction strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeStrategy {
    /// Recursive k-means partitioning from the root down.
    TopDown,
    /// Repeated clustering of node embeddings from the leaves up.
    BottomUp,
}

/// Tree builder configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    pub strategy: TreeStrategy,
    /// Nodes with fewer documents than this are never split.
    pub min_split_size: usize,
    /// Non-root nodes at or below this size stop splitting.
    pub max_cluster_size: usize,
    pub max_depth: u32,
    pub k_min: usize,
    pub k_max: usize,
    pub seed: u64,
    pub kmeans_max_iter: usize,
    pub summary_max_chars: usize,
    /// Sentences kept by the extractive summarizer.
    pub summary_sentences: usize,
    /// Descendant documents sampled as summarizer input.
    pub summary_sample_size: usize,
    /// Bound on the concatenated excerpt stored as interior `content`.
    pub content_max_chars: usize,
    /// Bound on `source_documents` per node.
    pub source_documents_limit: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            strategy: TreeStrategy::TopDown,
            min_split_size: defaults::DEFAULT_MIN_SPLIT_SIZE,
            max_cluster_size: defaults::DEFAULT_MAX_CLUSTER_SIZE,
            max_depth: defaults::DEFAULT_MAX_DEPTH,
            k_min: defaults::DEFAULT_K_MIN,
            k_max: defaults::DEFAULT_K_MAX,
            seed: defaults::DEFAULT_SEED,
            kmeans_max_iter: defaults::DEFAULT_KMEANS_MAX_ITER,
            summary_max_chars: defaults::DEFAULT_SUMMARY_MAX_CHARS,
            summary_sentences: defaults::DEFAULT_SUMMARY_SENTENCES,
            summary_sample_size: defaults::DEFAULT_SUMMARY_SAMPLE_SIZE,
            content_max_chars: defaults::DEFAULT_CONTENT_MAX_CHARS,
            source_documents_limit: defaults::DEFAULT_SOURCE_DOCUMENTS_LIMIT,
        }
    }
}
