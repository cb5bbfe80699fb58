//! Ranking primitives. Each returns `(position, score)` pairs, where
//! `position` indexes [`RetrievalIndex::nodes`](crate::RetrievalIndex::nodes),
//! sorted by descending score with ties kept in index order.

pub mod hybrid;
pub mod keyword;
pub mod semantic;

pub use hybrid::{fuse, HybridScore};
pub use keyword::{keyword_scores, query_tokens};
pub use semantic::semantic_scores;
