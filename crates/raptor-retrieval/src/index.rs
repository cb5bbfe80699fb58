//! The searchable view of a tree: one entry per node with non-blank text,
//! in node-id order, with a parallel embedding matrix.

use tracing::info;

use raptor_core::errors::{RaptorResult, RetrievalError};
use raptor_core::models::TreeNode;
use raptor_core::text::is_blank;
use raptor_embeddings::{corpus_fingerprint, EmbeddingEngine, NodeInfo};
use raptor_tree::{PersistedTree, RaptorTree};

#[derive(Debug, Clone, PartialEq)]
pub struct IndexedNode {
    pub node_id: String,
    pub level: u32,
    pub is_leaf: bool,
    /// Summary followed by content.
    pub text: String,
    /// Lowercased `text`, for keyword matching.
    pub text_lower: String,
}

#[derive(Debug, Clone)]
pub struct RetrievalIndex {
    nodes: Vec<IndexedNode>,
    embeddings: Vec<Vec<f32>>,
    fingerprint: String,
}

impl RetrievalIndex {
    /// Index a loaded tree file.
    pub fn from_persisted(tree: &PersistedTree, engine: &EmbeddingEngine) -> RaptorResult<Self> {
        Self::from_nodes(tree.tree_nodes.values(), engine)
    }

    /// Index an in-memory tree.
    pub fn from_tree(tree: &RaptorTree, engine: &EmbeddingEngine) -> RaptorResult<Self> {
        Self::from_nodes(tree.nodes().values(), engine)
    }

    /// Index `nodes` in iteration order. Node embeddings come from the
    /// engine's cache, keyed by a fingerprint of the indexed texts, and
    /// are rebuilt when missing or stale.
    pub fn from_nodes<'n>(
        nodes: impl IntoIterator<Item = &'n TreeNode>,
        engine: &EmbeddingEngine,
    ) -> RaptorResult<Self> {
        let nodes: Vec<IndexedNode> = nodes
            .into_iter()
            .map(|n| {
                let text = n.search_text();
                IndexedNode {
                    node_id: n.node_id.clone(),
                    level: n.level,
                    is_leaf: n.is_leaf,
                    text_lower: text.to_lowercase(),
                    text,
                }
            })
            .filter(|n| !is_blank(&n.text))
            .collect();

        let ids: Vec<String> = nodes.iter().map(|n| n.node_id.clone()).collect();
        let texts: Vec<String> = nodes.iter().map(|n| n.text.clone()).collect();
        let fingerprint = corpus_fingerprint(&ids, &texts);
        let info: Vec<NodeInfo> = nodes
            .iter()
            .map(|n| NodeInfo::tree_node(&n.node_id, n.level, n.is_leaf, n.text.chars().count()))
            .collect();

        let cached = engine.load_or_build(&format!("tree_{fingerprint}"), &info, &texts)?;
        info!(nodes = nodes.len(), fingerprint = %fingerprint, "retrieval index ready");
        Self::new(nodes, cached.vectors, fingerprint)
    }

    /// Assemble an index from precomputed embeddings.
    pub fn new(
        nodes: Vec<IndexedNode>,
        embeddings: Vec<Vec<f32>>,
        fingerprint: String,
    ) -> RaptorResult<Self> {
        if nodes.len() != embeddings.len() {
            return Err(RetrievalError::IndexMismatch {
                nodes: nodes.len(),
                embeddings: embeddings.len(),
            }
            .into());
        }
        Ok(Self {
            nodes,
            embeddings,
            fingerprint,
        })
    }

    pub fn nodes(&self) -> &[IndexedNode] {
        &self.nodes
    }

    pub fn embeddings(&self) -> &[Vec<f32>] {
        &self.embeddings
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl IndexedNode {
    pub fn new(node_id: &str, level: u32, is_leaf: bool, text: &str) -> Self {
        Self {
            node_id: node_id.to_string(),
            level,
            is_leaf,
            text: text.to_string(),
            text_lower: text.to_lowercase(),
        }
    }
}
