//! JSON persistence of built trees and per-document metadata.
//!
//! The tree file is a single UTF-8 object (no ASCII escaping) with node
//! `content` and `summary` cut to 500 characters. Loading it back yields a
//! tree whose structure is identical to the one that was saved.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use raptor_core::constants::PERSISTED_TEXT_LIMIT;
use raptor_core::errors::{PersistError, RaptorResult};
use raptor_core::models::{ClusteringStats, DocumentMetadata, TreeNode};
use raptor_core::text::truncate_chars;

use crate::intake::ClassifiedCorpus;
use crate::tree::RaptorTree;

/// `strftime` pattern for build timestamps and output file names.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedTree {
    pub timestamp: String,
    pub scale: String,
    pub total_documents: usize,
    /// Stage level of each input document, in intake order.
    pub doc_levels: Vec<u8>,
    pub doc_labels: Vec<String>,
    pub level_distribution: BTreeMap<u8, usize>,
    pub build_time_seconds: f64,
    pub total_nodes: usize,
    pub max_depth: u32,
    pub leaf_count: usize,
    pub clustering_stats: ClusteringStats,
    pub tree_nodes: BTreeMap<String, TreeNode>,
}

impl PersistedTree {
    pub fn new(
        tree: &RaptorTree,
        corpus: &ClassifiedCorpus,
        scale: &str,
        build_time_seconds: f64,
        timestamp: String,
    ) -> Self {
        let tree_nodes = tree
            .nodes()
            .iter()
            .map(|(id, node)| {
                let mut node = node.clone();
                node.content = truncate_chars(&node.content, PERSISTED_TEXT_LIMIT).to_string();
                node.summary = truncate_chars(&node.summary, PERSISTED_TEXT_LIMIT).to_string();
                (id.clone(), node)
            })
            .collect();

        Self {
            timestamp,
            scale: scale.to_string(),
            total_documents: corpus.len(),
            doc_levels: corpus.levels(),
            doc_labels: corpus.labels(),
            level_distribution: corpus.level_distribution.clone(),
            build_time_seconds,
            total_nodes: tree.len(),
            max_depth: tree.depth(),
            leaf_count: tree.leaf_count(),
            clustering_stats: tree.stats().clone(),
            tree_nodes,
        }
    }

    /// Rebuild and validate the in-memory tree.
    pub fn to_tree(&self) -> RaptorResult<RaptorTree> {
        let roots: Vec<&TreeNode> = self
            .tree_nodes
            .values()
            .filter(|n| n.parent_id.is_none())
            .collect();
        let [root] = roots.as_slice() else {
            return Err(PersistError::Malformed {
                path: String::new(),
                reason: format!("expected exactly one root, found {}", roots.len()),
            }
            .into());
        };
        RaptorTree::new(
            self.tree_nodes.clone(),
            root.node_id.clone(),
            self.clustering_stats.clone(),
        )
    }
}

/// Current local time in [`TIMESTAMP_FORMAT`].
pub fn timestamp_now() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Write `tree` as pretty-printed JSON, creating parent directories.
pub fn save_tree(path: &Path, tree: &PersistedTree) -> RaptorResult<()> {
    write_json(path, tree)?;
    info!(
        path = %path.display(),
        nodes = tree.total_nodes,
        leaves = tree.leaf_count,
        "tree saved"
    );
    Ok(())
}

pub fn load_tree(path: &Path) -> RaptorResult<PersistedTree> {
    let raw = fs::read_to_string(path)?;
    let tree: PersistedTree = serde_json::from_str(&raw).map_err(|e| PersistError::Malformed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    info!(path = %path.display(), nodes = tree.tree_nodes.len(), "tree loaded");
    Ok(tree)
}

pub fn save_document_metadata(path: &Path, metadata: &[DocumentMetadata]) -> RaptorResult<()> {
    write_json(path, &metadata)?;
    info!(path = %path.display(), documents = metadata.len(), "document metadata saved");
    Ok(())
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> RaptorResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_has_expected_shape() {
        let ts = timestamp_now();
        assert_eq!(ts.len(), 15);
        assert_eq!(&ts[8..9], "_");
    }

    #[test]
    fn malformed_file_is_reported_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tree.json");
        fs::write(&path, "[]").unwrap();
        let err = load_tree(&path).unwrap_err();
        assert!(err.to_string().contains("tree.json"));
    }
}
