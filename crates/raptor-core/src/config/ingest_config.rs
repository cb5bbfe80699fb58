use serde::{Deserialize, Serialize};

use super::defaults;

/// PubMed E-utilities ingestion configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    pub base_url: String,
    /// Contact address sent with every request.
    pub email: Option<String>,
    pub tool: String,
    pub max_workers: usize,
    /// Minimum gap between any two requests, shared by all workers.
    pub request_gap_ms: u64,
    /// Pause before each efetch batch.
    pub fetch_gap_ms: u64,
    pub batch_size: usize,
    pub max_results_per_query: usize,
    /// Per-level cap on level-0 articles during collection.
    pub level_0_max: usize,
    pub timeout_secs: u64,
    pub cache_dir: String,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::DEFAULT_EUTILS_BASE_URL.to_string(),
            email: None,
            tool: defaults::DEFAULT_INGEST_TOOL.to_string(),
            max_workers: defaults::DEFAULT_INGEST_MAX_WORKERS,
            request_gap_ms: defaults::DEFAULT_REQUEST_GAP_MS,
            fetch_gap_ms: defaults::DEFAULT_FETCH_GAP_MS,
            batch_size: defaults::DEFAULT_FETCH_BATCH_SIZE,
            max_results_per_query: defaults::DEFAULT_MAX_RESULTS_PER_QUERY,
            level_0_max: defaults::DEFAULT_COLLECTION_LEVEL_0_MAX,
            timeout_secs: defaults::DEFAULT_HTTP_TIMEOUT_SECS,
            cache_dir: defaults::DEFAULT_INGEST_CACHE_DIR.to_string(),
        }
    }
}
