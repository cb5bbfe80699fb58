/// Retrieval subsystem errors.
#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error("index has {nodes} nodes but {embeddings} embeddings")]
    IndexMismatch { nodes: usize, embeddings: usize },

    #[error("unknown search mode: {mode}")]
    UnknownMode { mode: String },

    #[error("search failed: {reason}")]
    SearchFailed { reason: String },
}
