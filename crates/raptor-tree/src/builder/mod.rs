//! Tree construction.
//!
//! `TreeBuilder` dispatches to the top-down or bottom-up strategy. Both
//! strategies create nodes through the shared `NodeAssembler`, which owns
//! the node map while it is being written and derives every interior
//! field (content excerpt, summary, size, source documents) from the
//! node's children.

mod bottom_up;
mod top_down;

use std::collections::{BTreeMap, BTreeSet};

use tracing::{info, info_span};

use raptor_core::cancel::CancellationToken;
use raptor_core::config::{TreeConfig, TreeStrategy};
use raptor_core::constants::{spans, INTERIOR_NODE_PREFIX, ROOT_NODE_ID};
use raptor_core::errors::{BuildStage, ClusterError, RaptorResult};
use raptor_core::models::{ClusteringStats, Document, TreeNode};
use raptor_core::text::{is_blank, truncate_chars};
use raptor_core::traits::ISummarizer;

use crate::tree::RaptorTree;

/// Separator between child texts in an interior node's content.
const CONTENT_SEPARATOR: &str = "\n\n";

pub struct TreeBuilder {
    config: TreeConfig,
    summarizer: Box<dyn ISummarizer>,
}

impl TreeBuilder {
    pub fn new(config: TreeConfig, summarizer: Box<dyn ISummarizer>) -> Self {
        Self { config, summarizer }
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Build a tree over `documents`, with `embeddings[i]` belonging to
    /// `documents[i]`. The result has passed [`RaptorTree::validate`].
    ///
    /// Leaves are keyed by document id. The root is `root` and interior
    /// nodes are `node_<n>`; when a document already uses such an id the
    /// root becomes `root_<n>` and the interior counter skips it.
    ///
    /// A leaf covers exactly one source document, and so does every node
    /// whose `source_documents` has length 1, with one exception: a
    /// one-document corpus still gets an interior root over its single leaf.
    pub fn build(
        &self,
        documents: &[Document],
        embeddings: &[Vec<f32>],
        cancel: &CancellationToken,
    ) -> RaptorResult<RaptorTree> {
        let _span = info_span!(
            spans::CLUSTER,
            documents = documents.len(),
            strategy = ?self.config.strategy
        )
        .entered();

        if documents.is_empty() {
            return Err(ClusterError::EmptyInput.into());
        }
        if documents.len() != embeddings.len() {
            return Err(ClusterError::LengthMismatch {
                documents: documents.len(),
                embeddings: embeddings.len(),
            }
            .into());
        }

        let mut assembler =
            NodeAssembler::new(&self.config, self.summarizer.as_ref(), documents);
        match self.config.strategy {
            TreeStrategy::TopDown => {
                top_down::build(&mut assembler, documents, embeddings, cancel)?
            }
            TreeStrategy::BottomUp => {
                bottom_up::build(&mut assembler, documents, embeddings, cancel)?
            }
        }

        let (root_id, nodes, stats) = assembler.finish();
        let tree = RaptorTree::new(nodes, root_id, stats)?;
        info!(
            nodes = tree.len(),
            leaves = tree.leaf_count(),
            depth = tree.depth(),
            splits = tree.stats().split_count(),
            avg_k = tree.stats().avg_k,
            "tree built"
        );
        Ok(tree)
    }
}

/// Single writer of the node map during a build.
pub(crate) struct NodeAssembler<'a> {
    config: &'a TreeConfig,
    summarizer: &'a dyn ISummarizer,
    nodes: BTreeMap<String, TreeNode>,
    stats: ClusteringStats,
    /// Document ids, which interior ids must not reuse.
    reserved: BTreeSet<String>,
    root_id: String,
    next_interior: usize,
}

impl<'a> NodeAssembler<'a> {
    fn new(
        config: &'a TreeConfig,
        summarizer: &'a dyn ISummarizer,
        documents: &[Document],
    ) -> Self {
        let reserved: BTreeSet<String> = documents.iter().map(|d| d.id.clone()).collect();
        let root_id = std::iter::once(ROOT_NODE_ID.to_string())
            .chain((1usize..).map(|n| format!("{ROOT_NODE_ID}_{n}")))
            .find(|id| !reserved.contains(id))
            .unwrap_or_else(|| ROOT_NODE_ID.to_string());
        Self {
            config,
            summarizer,
            nodes: BTreeMap::new(),
            stats: ClusteringStats::default(),
            reserved,
            root_id,
            next_interior: 0,
        }
    }

    pub(crate) fn root_id(&self) -> String {
        self.root_id.clone()
    }

    pub(crate) fn config(&self) -> &'a TreeConfig {
        self.config
    }

    pub(crate) fn stats_mut(&mut self) -> &mut ClusteringStats {
        &mut self.stats
    }

    /// Next free `node_<n>` id.
    pub(crate) fn allocate_id(&mut self) -> String {
        loop {
            let id = format!("{INTERIOR_NODE_PREFIX}{}", self.next_interior);
            self.next_interior += 1;
            if !self.reserved.contains(&id) && !self.nodes.contains_key(&id) {
                return id;
            }
        }
    }

    /// Insert the leaf for `doc`. Parent, level and cluster id are filled in
    /// when the leaf is attached to an interior node.
    pub(crate) fn insert_leaf(&mut self, doc: &Document, level: u32) -> RaptorResult<String> {
        let node = TreeNode {
            node_id: doc.id.clone(),
            parent_id: None,
            children: Vec::new(),
            level,
            content: doc.text.clone(),
            summary: String::new(),
            is_leaf: true,
            cluster_id: None,
            cluster_size: 1,
            source_documents: vec![doc.id.clone()],
        };
        self.insert(node)?;
        Ok(doc.id.clone())
    }

    /// Insert interior node `node_id` over `children`, which must already be
    /// in the map. Each child is re-parented to `node_id` and numbered by
    /// its position.
    pub(crate) fn insert_interior(
        &mut self,
        node_id: String,
        level: u32,
        children: Vec<String>,
    ) -> RaptorResult<()> {
        let limit = self.config.source_documents_limit;
        let sample_size = self.config.summary_sample_size;

        let mut excerpts = Vec::with_capacity(children.len());
        let mut child_summaries = Vec::new();
        let mut source_documents = Vec::new();
        let mut cluster_size = 0;

        for (position, child_id) in children.iter().enumerate() {
            let child = self.nodes.get_mut(child_id).ok_or_else(|| {
                ClusterError::IntegrityViolation {
                    details: format!("{node_id} references unknown child {child_id}"),
                }
            })?;
            child.parent_id = Some(node_id.clone());
            child.cluster_id = Some(position as u32);

            cluster_size += child.cluster_size;
            if child.is_leaf {
                excerpts.push(child.content.clone());
            } else {
                excerpts.push(child.summary.clone());
                child_summaries.push(child.summary.clone());
            }
            for doc_id in &child.source_documents {
                if source_documents.len() < limit {
                    source_documents.push(doc_id.clone());
                }
            }
        }

        let mut summary_input = child_summaries;
        summary_input.extend(
            source_documents
                .iter()
                .take(sample_size)
                .filter_map(|id| self.nodes.get(id))
                .filter(|n| n.is_leaf)
                .map(|n| n.content.clone()),
        );

        let joined = excerpts.join(CONTENT_SEPARATOR);
        let content = truncate_chars(&joined, self.config.content_max_chars).to_string();
        let mut summary = self
            .summarizer
            .summarize(&summary_input, self.config.summary_max_chars)
            .map_err(|e| e.at_stage(BuildStage::Summarize))?;
        if is_blank(&summary) {
            summary = content.clone();
        }
        let summary = truncate_chars(&summary, self.config.summary_max_chars).to_string();

        self.insert(TreeNode {
            node_id,
            parent_id: None,
            children,
            level,
            content,
            summary,
            is_leaf: false,
            cluster_id: None,
            cluster_size,
            source_documents,
        })
    }

    /// Set every node's level to its distance from `root_id`.
    pub(crate) fn assign_levels(&mut self, root_id: &str) {
        let mut stack = vec![(root_id.to_string(), 0u32)];
        while let Some((id, level)) = stack.pop() {
            if let Some(node) = self.nodes.get_mut(&id) {
                node.level = level;
                stack.extend(node.children.iter().map(|c| (c.clone(), level + 1)));
            }
        }
    }

    fn insert(&mut self, node: TreeNode) -> RaptorResult<()> {
        if self.nodes.contains_key(&node.node_id) {
            return Err(ClusterError::DuplicateNodeId {
                node_id: node.node_id,
            }
            .into());
        }
        self.nodes.insert(node.node_id.clone(), node);
        Ok(())
    }

    fn finish(self) -> (String, BTreeMap<String, TreeNode>, ClusteringStats) {
        (self.root_id, self.nodes, self.stats)
    }
}
