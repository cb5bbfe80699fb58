//! Bottom-up layered clustering.
//!
//! Every document starts as a leaf. Each round clusters the current layer
//! (using the mean embedding of each group as its vector) and wraps every
//! multi-member cluster in a new interior node; singleton clusters move up
//! unchanged. Rounds stop once at most `max_cluster_size` nodes remain,
//! the depth budget is spent, or no valid k exists. The root is then
//! created over what is left and levels are assigned from the root down.
//!
//! The candidate k range is `ceil(n / max_cluster_size)` widened by
//! `k_max - k_min`, so large layers shrink quickly.

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
    let config = assembler.config();

    let mut layer: Vec<(String, Vec<f32>)> = Vec::with_capacity(documents.len());
    for (doc, embedding) in documents.iter().zip(embeddings) {
        layer.push((assembler.insert_leaf(doc, 0)?, embedding.clone()));
    }

    let max_rounds = config.max_depth.max(1) - 1;
    let span = config.k_max.saturating_sub(config.k_min);
    let mut rounds = 0u32;

    while layer.len() > config.max_cluster_size && rounds < max_rounds {
        if cancel.is_cancelled() {
            return Err(RaptorError::Cancelled);
        }

        let n = layer.len();
        let target = n.div_ceil(config.max_cluster_size).max(config.k_min);
        let vectors: Vec<Vec<f32>> = layer.iter().map(|(_, v)| v.clone()).collect();
        let Some(selection) = select_k(
            &vectors,
            target..=target + span,
            config.seed,
            config.kmeans_max_iter,
            cancel,
        )?
        else {
            debug!(round = rounds, n, "no valid k, stopping layer construction");
            break;
        };

        debug!(round = rounds, n, k = selection.k, "layer clustered");
        assembler
            .stats_mut()
            .record(selection.silhouette, selection.dbi, selection.k);

        let mut next = Vec::with_capacity(selection.k);
        for rows in selection.groups() {
            if let [only] = rows.as_slice() {
                next.push(layer[*only].clone());
                continue;
            }
            let children: Vec<String> = rows.iter().map(|&r| layer[r].0.clone()).collect();
            let centroid = mean_vector(rows.iter().map(|&r| layer[r].1.as_slice()));
            let node_id = assembler.allocate_id();
            assembler.insert_interior(node_id.clone(), 0, children)?;
            next.push((node_id, centroid));
        }

        layer = next;
        rounds += 1;
    }

    let root_children = layer.into_iter().map(|(id, _)| id).collect();
    let root_id = assembler.root_id();
    assembler.insert_interior(root_id.clone(), 0, root_children)?;
    assembler.assign_levels(&root_id);
    Ok(())
}

fn mean_vector<'v>(vectors: impl Iterator<Item = &'v [f32]>) -> Vec<f32> {
    let mut sum: Vec<f64> = Vec::new();
    let mut count = 0usize;
    for v in vectors {
        if sum.is_empty() {
            sum = vec![0.0; v.len()];
        }
        for (acc, x) in sum.iter_mut().zip(v) {
            *acc += *x as f64;
        }
        count += 1;
    }
    sum.into_iter()
        .map(|s| (s / count.max(1) as f64) as f32)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_two_vectors() {
        let a = [0.0f32, 2.0];
        let b = [2.0f32, 4.0];
        assert_eq!(mean_vector([&a[..], &b[..]].into_iter()), vec![1.0, 3.0]);
    }
}
