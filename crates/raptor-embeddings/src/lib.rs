//! # raptor-embeddings
//!
//! Dense embeddings for corpus documents, tree nodes and queries.
//!
//! - `providers`: the hashed TF-IDF provider and, behind the `onnx`
//!   feature, a sentence-transformer model run through ONNX Runtime.
//! - `cache`: the per-(corpus, model) binary artifact on disk plus a
//!   moka-backed query cache.
//! - `engine`: `EmbeddingEngine`, which ties the two together.

pub mod cache;
pub mod engine;
pub mod fingerprint;
pub mod providers;
pub mod similarity;
pub mod verify;

pub use cache::{CachedEmbeddings, NodeInfo};
pub use engine::EmbeddingEngine;
pub use fingerprint::corpus_fingerprint;
pub use similarity::cosine_similarity;
pub use verify::{verify_embeddings, EmbeddingStats};
