use serde::{Deserialize, Serialize};

use super::defaults;

/// Embedding provider and cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Provider name: "hashed-tfidf" or "onnx".
    pub provider: String,
    /// Model identifier; part of the on-disk cache key.
    pub model_id: String,
    /// Path to the ONNX model file (onnx provider only).
    pub model_path: Option<String>,
    /// Path to the `tokenizer.json` file (onnx provider only).
    pub tokenizer_path: Option<String>,
    pub dimensions: usize,
    pub batch_size: usize,
    /// Directory holding embedding cache artifacts.
    pub cache_dir: String,
    /// Capacity of the in-memory query embedding cache.
    pub query_cache_size: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: defaults::DEFAULT_EMBEDDING_PROVIDER.to_string(),
            model_id: defaults::DEFAULT_EMBEDDING_MODEL_ID.to_string(),
            model_path: None,
            tokenizer_path: None,
            dimensions: defaults::DEFAULT_EMBEDDING_DIMENSIONS,
            batch_size: defaults::DEFAULT_EMBEDDING_BATCH_SIZE,
            cache_dir: defaults::DEFAULT_EMBEDDING_CACHE_DIR.to_string(),
            query_cache_size: defaults::DEFAULT_QUERY_CACHE_SIZE,
        }
    }
}
