/// Embedding subsystem errors.
#[derive(Debug, thiserror::Error)]
pub enum EmbeddingError {
    #[error("model load failed for {path}: {reason}")]
    ModelLoadFailed { path: String, reason: String },

    #[error("inference failed: {reason}")]
    InferenceFailed { reason: String },

    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("unknown embedding provider: {name}")]
    UnknownProvider { name: String },

    #[error("embedding cache corrupted at {path}: {reason}")]
    CacheCorrupted { path: String, reason: String },

    #[error("cannot embed empty text")]
    EmptyText,
}
