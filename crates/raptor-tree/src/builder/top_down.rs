//! Top-down recursive partitioning.
//!
//! The root covers every document. A node is split when it holds at least
//! `min_split_size` documents, its children would stay within `max_depth`,
//! and it is either the root or larger than `max_cluster_size`. Each split
//! picks k by [`select_k`]; a node with no valid k becomes a terminal
//! bundle whose children are its documents' leaves. Clusters of one
//! document attach the leaf directly. Interior ids are allocated in
//! pre-order.

use tracing::debug;

use raptor_core::cancel::CancellationToken;
use raptor_core::errors::{RaptorError, RaptorResult};
use raptor_core::models::Document;

use super::NodeAssembler;
use crate::selection::select_k;

pub(crate) fn build(
    assembler: &mut NodeAssembler<'_>,
    documents: &[Document],
    embeddings: &[Vec<f32>],
    cancel: &CancellationToken,
) -> RaptorResult<()> {
    let members: Vec<usize> = (0..documents.len()).collect();
    let ctx = TopDown {
        documents,
        embeddings,
        cancel,
    };
    let root_id = assembler.root_id();
    ctx.build_node(assembler, root_id, 0, &members)
}

struct TopDown<'a> {
    documents: &'a [Document],
    embeddings: &'a [Vec<f32>],
    cancel: &'a CancellationToken,
}

impl TopDown<'_> {
    fn build_node(
        &self,
        assembler: &mut NodeAssembler<'_>,
        node_id: String,
        depth: u32,
        members: &[usize],
    ) -> RaptorResult<()> {
        if self.cancel.is_cancelled() {
            return Err(RaptorError::Cancelled);
        }

        let groups = match self.split(assembler, depth, members)? {
            Some(groups) => groups,
            None => members.iter().map(|&m| vec![m]).collect(),
        };

        let mut children = Vec::with_capacity(groups.len());
        for group in groups {
            if let [only] = group.as_slice() {
                children.push(assembler.insert_leaf(&self.documents[*only], depth + 1)?);
            } else {
                let child_id = assembler.allocate_id();
                self.build_node(assembler, child_id.clone(), depth + 1, &group)?;
                children.push(child_id);
            }
        }

        assembler.insert_interior(node_id, depth, children)
    }

    /// Member groups in cluster order, or `None` for a terminal bundle.
    fn split(
        &self,
        assembler: &mut NodeAssembler<'_>,
        depth: u32,
        members: &[usize],
    ) -> RaptorResult<Option<Vec<Vec<usize>>>> {
        let config = assembler.config();
        let n = members.len();
        let within_depth = depth + 1 < config.max_depth.max(1);
        let oversized = depth == 0 || n > config.max_cluster_size;
        if n < config.min_split_size || !within_depth || !oversized {
            return Ok(None);
        }

        let vectors: Vec<Vec<f32>> = members.iter().map(|&m| self.embeddings[m].clone()).collect();
        let Some(selection) = select_k(
            &vectors,
            config.k_min..=config.k_max,
            config.seed,
            config.kmeans_max_iter,
            self.cancel,
        )?
        else {
            debug!(depth, n, "no valid k, node becomes a terminal bundle");
            return Ok(None);
        };

        debug!(
            depth,
            n,
            k = selection.k,
            silhouette = selection.silhouette,
            dbi = selection.dbi,
            "node split"
        );
        assembler
            .stats_mut()
            .record(selection.silhouette, selection.dbi, selection.k);

        let groups = selection
            .groups()
            .into_iter()
            .map(|rows| rows.into_iter().map(|r| members[r]).collect())
            .collect();
        Ok(Some(groups))
    }
}
