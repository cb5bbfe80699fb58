mod clustering_stats;
mod document;
mod stage;
mod tree_node;

pub use clustering_stats::ClusteringStats;
pub use document::{ClassifiedDocument, Document, DocumentMetadata};
pub use stage::StageLevel;
pub use tree_node::TreeNode;
