use serde::{Deserialize, Serialize};

/// One node of a RAPTOR tree. Leaves wrap a single document; interior nodes
/// summarize their subtree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    pub node_id: String,
    pub parent_id: Option<String>,
    /// Ordered by ascending `cluster_id`.
    pub children: Vec<String>,
    /// Depth from the root (root = 0).
    pub level: u32,
    pub content: String,
    /// Empty for leaves.
    pub summary: String,
    pub is_leaf: bool,
    /// Position among the parent's children. `None` for the root.
    pub cluster_id: Option<u32>,
    /// Number of leaf documents in the subtree.
    pub cluster_size: usize,
    /// Leaf document ids in subtree order, bounded for storage.
    pub source_documents: Vec<String>,
}

impl TreeNode {
    /// Text used for indexing: summary followed by content.
    pub fn search_text(&self) -> String {
        if self.summary.is_empty() {
            self.content.clone()
        } else {
            format!("{} {}", self.summary, self.content)
        }
    }
}
