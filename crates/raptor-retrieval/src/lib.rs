//! # raptor-retrieval
//!
//! Tri-modal retrieval over the full node set of a RAPTOR tree (interior
//! summaries as well as leaves):
//!
//! - keyword: count of query tokens found in the node text
//! - semantic: cosine similarity of query and node embeddings
//! - hybrid: weighted blend of max-normalized keyword and semantic scores
//!
//! All searches are pure functions of `(index, query)`.

pub mod comparison;
pub mod engine;
pub mod hit;
pub mod index;
pub mod search;

pub use comparison::{
    write_csv, write_json, ComparisonRunner, ComparisonSummary, ModeResult, QueryComparison,
    TimingStats, DEFAULT_QUERIES,
};
pub use engine::RetrievalEngine;
pub use hit::{HitScore, SearchHit, SearchMode};
pub use index::{IndexedNode, RetrievalIndex};
