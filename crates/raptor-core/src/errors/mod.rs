mod cluster_error;
mod embedding_error;
mod ingest_error;
mod persist_error;
mod retrieval_error;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use cluster_error::ClusterError;
pub use embedding_error::EmbeddingError;
pub use ingest_error::IngestError;
pub use persist_error::PersistError;
pub use retrieval_error::RetrievalError;

/// Result alias used across the workspace.
pub type RaptorResult<T> = Result<T, RaptorError>;

/// Pipeline stage an error escaped from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildStage {
    Ingest,
    Embed,
    Cluster,
    Summarize,
    Persist,
}

impl fmt::Display for BuildStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Ingest => "ingest",
            Self::Embed => "embed",
            Self::Cluster => "cluster",
            Self::Summarize => "summarize",
            Self::Persist => "persist",
        };
        f.write_str(name)
    }
}

/// Top-level error type. Subsystem errors convert in via `#[from]`.
#[derive(Debug, thiserror::Error)]
pub enum RaptorError {
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    #[error("embedding error: {0}")]
    EmbeddingError(#[from] EmbeddingError),

    #[error("cluster error: {0}")]
    ClusterError(#[from] ClusterError),

    #[error("persist error: {0}")]
    PersistError(#[from] PersistError),

    #[error("ingest error: {0}")]
    IngestError(#[from] IngestError),

    #[error("retrieval error: {0}")]
    RetrievalError(#[from] RetrievalError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("operation cancelled")]
    Cancelled,

    #[error("a build is already running on this pipeline")]
    BuildInProgress,

    #[error("{stage} stage failed: {source}")]
    StageFailed {
        stage: BuildStage,
        #[source]
        source: Box<RaptorError>,
    },
}

impl RaptorError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Tag this error with the stage it escaped from. An error that already
    /// carries a stage keeps the innermost one.
    pub fn at_stage(self, stage: BuildStage) -> Self {
        match self {
            Self::StageFailed { .. } | Self::Cancelled | Self::BuildInProgress => self,
            other => Self::StageFailed {
                stage,
                source: Box::new(other),
            },
        }
    }

    /// The stage this error is tagged with, if any.
    pub fn stage(&self) -> Option<BuildStage> {
        match self {
            Self::StageFailed { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}
