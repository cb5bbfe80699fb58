//! The built tree: an id-keyed node map plus the root id and the
//! clustering statistics gathered while building it.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use raptor_core::errors::{ClusterError, RaptorResult};
use raptor_core::models::{ClusteringStats, TreeNode};

#[derive(Debug, Clone, PartialEq)]
pub struct RaptorTree {
    nodes: BTreeMap<String, TreeNode>,
    root_id: String,
    stats: ClusteringStats,
}

impl RaptorTree {
    /// Assemble a tree and run [`RaptorTree::validate`] on it.
    pub fn new(
        nodes: BTreeMap<String, TreeNode>,
        root_id: impl Into<String>,
        stats: ClusteringStats,
    ) -> RaptorResult<Self> {
        let tree = Self {
            nodes,
            root_id: root_id.into(),
            stats,
        };
        tree.validate()?;
        Ok(tree)
    }

    pub fn root(&self) -> &TreeNode {
        // validate() guarantees the root exists.
        &self.nodes[&self.root_id]
    }

    pub fn root_id(&self) -> &str {
        &self.root_id
    }

    pub fn node(&self, id: &str) -> Option<&TreeNode> {
        self.nodes.get(id)
    }

    /// Children of `id` in cluster order. Empty for leaves and unknown ids.
    pub fn children(&self, id: &str) -> Vec<&TreeNode> {
        self.nodes
            .get(id)
            .map(|n| {
                n.children
                    .iter()
                    .filter_map(|c| self.nodes.get(c))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Leaves in depth-first order from the root.
    pub fn leaves(&self) -> Vec<&TreeNode> {
        let mut out = Vec::new();
        let mut stack = vec![self.root_id.as_str()];
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get(id) else {
                continue;
            };
            if node.is_leaf {
                out.push(node);
            }
            stack.extend(node.children.iter().rev().map(String::as_str));
        }
        out
    }

    /// Largest node level; a lone root has depth 0.
    pub fn depth(&self) -> u32 {
        self.nodes.values().map(|n| n.level).max().unwrap_or(0)
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.values().filter(|n| n.is_leaf).count()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &BTreeMap<String, TreeNode> {
        &self.nodes
    }

    pub fn stats(&self) -> &ClusteringStats {
        &self.stats
    }

    pub fn into_parts(self) -> (BTreeMap<String, TreeNode>, String, ClusteringStats) {
        (self.nodes, self.root_id, self.stats)
    }

    /// Check every structural invariant of the tree.
    ///
    /// - the root exists, has no parent and level 0; no other node lacks a parent
    /// - interior nodes have children, each pointing back at them one level down
    /// - leaves have no children, size 1 and `source_documents == [id]`
    /// - interior sizes are the sum of their children's
    /// - every node is reachable from the root exactly once
    pub fn validate(&self) -> RaptorResult<()> {
        let Some(root) = self.nodes.get(&self.root_id) else {
            return Err(violation(format!("root {} missing", self.root_id)));
        };
        if root.parent_id.is_some() || root.level != 0 {
            return Err(violation(format!(
                "root {} must have no parent and level 0",
                self.root_id
            )));
        }

        for (id, node) in &self.nodes {
            if *id != node.node_id {
                return Err(violation(format!("key {id} holds node {}", node.node_id)));
            }
            if node.parent_id.is_none() && *id != self.root_id {
                return Err(violation(format!("second parentless node {id}")));
            }
            if node.is_leaf {
                check_leaf(node)?;
            } else {
                self.check_interior(node)?;
            }
        }

        let mut seen = BTreeSet::new();
        let mut queue = VecDeque::from([self.root_id.as_str()]);
        while let Some(id) = queue.pop_front() {
            if !seen.insert(id) {
                return Err(violation(format!("node {id} reached twice")));
            }
            if let Some(node) = self.nodes.get(id) {
                queue.extend(node.children.iter().map(String::as_str));
            }
        }
        if seen.len() != self.nodes.len() {
            return Err(violation(format!(
                "{} of {} nodes reachable from the root",
                seen.len(),
                self.nodes.len()
            )));
        }
        Ok(())
    }

    fn check_interior(&self, node: &TreeNode) -> RaptorResult<()> {
        if node.children.is_empty() {
            return Err(violation(format!("interior node {} has no children", node.node_id)));
        }
        let mut size = 0usize;
        for child_id in &node.children {
            let Some(child) = self.nodes.get(child_id) else {
                return Err(violation(format!(
                    "{} lists missing child {child_id}",
                    node.node_id
                )));
            };
            if child.parent_id.as_deref() != Some(node.node_id.as_str()) {
                return Err(violation(format!(
                    "{child_id} does not point back at parent {}",
                    node.node_id
                )));
            }
            if child.level != node.level + 1 {
                return Err(violation(format!(
                    "{child_id} at level {} under {} at level {}",
                    child.level, node.node_id, node.level
                )));
            }
            size += child.cluster_size;
        }
        if size != node.cluster_size {
            return Err(violation(format!(
                "{} has size {} but children sum to {size}",
                node.node_id, node.cluster_size
            )));
        }
        Ok(())
    }
}

fn check_leaf(node: &TreeNode) -> RaptorResult<()> {
    if !node.children.is_empty() {
        return Err(violation(format!("leaf {} has children", node.node_id)));
    }
    if node.cluster_size != 1 {
        return Err(violation(format!("leaf {} has size {}", node.node_id, node.cluster_size)));
    }
    if node.source_documents.len() != 1 || node.source_documents[0] != node.node_id {
        return Err(violation(format!(
            "leaf {} must list only itself as source",
            node.node_id
        )));
    }
    Ok(())
}

fn violation(details: String) -> raptor_core::RaptorError {
    ClusterError::IntegrityViolation { details }.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(id: &str, parent: &str, level: u32) -> TreeNode {
        TreeNode {
            node_id: id.into(),
            parent_id: Some(parent.into()),
            children: vec![],
            level,
            content: format!("text of {id}"),
            summary: String::new(),
            is_leaf: true,
            cluster_id: Some(0),
            cluster_size: 1,
            source_documents: vec![id.into()],
        }
    }

    fn small_tree() -> BTreeMap<String, TreeNode> {
        let root = TreeNode {
            node_id: "root".into(),
            parent_id: None,
            children: vec!["a".into(), "b".into()],
            level: 0,
            content: "a b".into(),
            summary: "summary".into(),
            is_leaf: false,
            cluster_id: None,
            cluster_size: 2,
            source_documents: vec!["a".into(), "b".into()],
        };
        [root, leaf("a", "root", 1), leaf("b", "root", 1)]
            .into_iter()
            .map(|n| (n.node_id.clone(), n))
            .collect()
    }

    #[test]
    fn accessors_on_valid_tree() {
        let tree = RaptorTree::new(small_tree(), "root", ClusteringStats::default()).unwrap();
        assert_eq!(tree.root().node_id, "root");
        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.leaf_count(), 2);
        let leaves: Vec<&str> = tree.leaves().iter().map(|n| n.node_id.as_str()).collect();
        assert_eq!(leaves, vec!["a", "b"]);
        assert_eq!(tree.children("root").len(), 2);
        assert!(tree.children("a").is_empty());
        assert!(tree.node("missing").is_none());
    }

    #[test]
    fn wrong_size_is_rejected() {
        let mut nodes = small_tree();
        nodes.get_mut("root").unwrap().cluster_size = 3;
        assert!(RaptorTree::new(nodes, "root", ClusteringStats::default()).is_err());
    }

    #[test]
    fn dangling_parent_pointer_is_rejected() {
        let mut nodes = small_tree();
        nodes.get_mut("b").unwrap().parent_id = Some("a".into());
        assert!(RaptorTree::new(nodes, "root", ClusteringStats::default()).is_err());
    }

    #[test]
    fn orphan_is_rejected() {
        let mut nodes = small_tree();
        nodes.insert("c".into(), leaf("c", "root", 1));
        assert!(RaptorTree::new(nodes, "root", ClusteringStats::default()).is_err());
    }

    #[test]
    fn missing_root_is_rejected() {
        assert!(RaptorTree::new(small_tree(), "nope", ClusteringStats::default()).is_err());
    }
}
