/// Errors reading or writing persisted trees and metadata.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("malformed persisted tree at {path}: {reason}")]
    Malformed { path: String, reason: String },

    #[error("corpus file {path} is not a supported format")]
    UnsupportedCorpusFile { path: String },
}
