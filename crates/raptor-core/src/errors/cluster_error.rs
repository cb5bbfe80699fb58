/// Clustering and tree-construction errors.
#[derive(Debug, thiserror::Error)]
pub enum ClusterError {
    #[error("cannot cluster an empty input")]
    EmptyInput,

    #[error("invalid cluster count {requested} for {n_items} items")]
    InvalidClusterCount { requested: usize, n_items: usize },

    #[error("embedding count {embeddings} does not match document count {documents}")]
    LengthMismatch { documents: usize, embeddings: usize },

    #[error("duplicate node id: {node_id}")]
    DuplicateNodeId { node_id: String },

    #[error("tree integrity violation: {details}")]
    IntegrityViolation { details: String },
}
