/// Literature-ingestion errors.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("HTTP request failed: {reason}")]
    Http { reason: String },

    #[error("failed to parse response: {reason}")]
    Parse { reason: String },

    #[error("worker pool setup failed: {reason}")]
    WorkerPool { reason: String },
}
