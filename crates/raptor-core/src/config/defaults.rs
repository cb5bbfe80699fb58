//! Default values for every configuration section.

// Embedding
pub const DEFAULT_EMBEDDING_PROVIDER: &str = "hashed-tfidf";
pub const DEFAULT_EMBEDDING_MODEL_ID: &str = "all-MiniLM-L6-v2";
pub const DEFAULT_EMBEDDING_DIMENSIONS: usize = 384;
pub const DEFAULT_EMBEDDING_BATCH_SIZE: usize = 32;
pub const DEFAULT_EMBEDDING_CACHE_DIR: &str = "data/embeddings_cache";
pub const DEFAULT_QUERY_CACHE_SIZE: u64 = 10_000;

// Tree
pub const DEFAULT_MIN_SPLIT_SIZE: usize = 2;
pub const DEFAULT_MAX_CLUSTER_SIZE: usize = 50;
pub const DEFAULT_MAX_DEPTH: u32 = 6;
pub const DEFAULT_K_MIN: usize = 2;
pub const DEFAULT_K_MAX: usize = 5;
pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_KMEANS_MAX_ITER: usize = 100;
pub const DEFAULT_SUMMARY_MAX_CHARS: usize = 500;
pub const DEFAULT_SUMMARY_SENTENCES: usize = 3;
pub const DEFAULT_SUMMARY_SAMPLE_SIZE: usize = 10;
pub const DEFAULT_CONTENT_MAX_CHARS: usize = 2_000;
pub const DEFAULT_SOURCE_DOCUMENTS_LIMIT: usize = 30;

// Intake
pub const DEFAULT_LEVEL_0_LIMIT: usize = 500;

// Retrieval
pub const DEFAULT_KEYWORD_WEIGHT: f64 = 0.4;
pub const DEFAULT_SEMANTIC_WEIGHT: f64 = 0.6;
pub const DEFAULT_CANDIDATE_POOL: usize = 100;
pub const DEFAULT_TOP_K: usize = 5;

// Ingest
pub const DEFAULT_EUTILS_BASE_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";
pub const DEFAULT_INGEST_TOOL: &str = "treg-raptor";
pub const DEFAULT_INGEST_MAX_WORKERS: usize = 3;
pub const DEFAULT_REQUEST_GAP_MS: u64 = 400;
pub const DEFAULT_FETCH_GAP_MS: u64 = 340;
pub const DEFAULT_FETCH_BATCH_SIZE: usize = 200;
pub const DEFAULT_MAX_RESULTS_PER_QUERY: usize = 200;
pub const DEFAULT_COLLECTION_LEVEL_0_MAX: usize = 200;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_INGEST_CACHE_DIR: &str = "pubmed_cache";

// Observability
pub const DEFAULT_LOG_LEVEL: &str = "info";
