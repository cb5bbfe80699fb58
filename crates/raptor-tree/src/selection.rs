//! Choosing the number of clusters for one split.
//!
//! Every candidate k is clustered with the same seed and scored with
//! `0.5 * (S + 1) / 2 + 0.5 / (1 + D)`, where S is the silhouette and D the
//! Davies–Bouldin index. A k whose labelling has fewer than two clusters,
//! or whose metrics are undefined, is skipped.

use std::ops::RangeInclusive;

use tracing::debug;

use raptor_core::cancel::CancellationToken;
use raptor_core::errors::{RaptorError, RaptorResult};

use crate::algorithms::kmeans::KMeans;
use crate::algorithms::quality::{davies_bouldin_index, silhouette_score};

/// The winning clustering of a split.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// Number of distinct clusters in `labels`.
    pub k: usize,
    /// Compact labels in `0..k`, one per input row.
    pub labels: Vec<usize>,
    pub silhouette: f64,
    pub dbi: f64,
    pub score: f64,
}

impl Selection {
    /// Row indices per cluster, ascending cluster id, rows in input order.
    pub fn groups(&self) -> Vec<Vec<usize>> {
        let mut groups = vec![Vec::new(); self.k];
        for (row, &label) in self.labels.iter().enumerate() {
            groups[label].push(row);
        }
        groups
    }
}

/// Equal-weight blend of normalized silhouette and inverted DBI, in `[0, 1]`.
pub fn combined_score(silhouette: f64, dbi: f64) -> f64 {
    let s = (silhouette + 1.0) / 2.0;
    let d = 1.0 / (1.0 + dbi);
    0.5 * s + 0.5 * d
}

/// Best clustering of `embeddings` over the candidate `ks`, or `None` when
/// no candidate is valid. Candidates `>= n` are ignored; ties keep the
/// smaller k.
///
/// The cancellation token is checked before each k-means run.
pub fn select_k(
    embeddings: &[Vec<f32>],
    ks: RangeInclusive<usize>,
    seed: u64,
    max_iter: usize,
    cancel: &CancellationToken,
) -> RaptorResult<Option<Selection>> {
    let n = embeddings.len();
    let mut best: Option<Selection> = None;

    for k in ks.filter(|&k| k >= 2 && k < n) {
        if cancel.is_cancelled() {
            return Err(RaptorError::Cancelled);
        }

        let raw = KMeans::new(k, seed)
            .with_max_iter(max_iter)
            .fit_predict(embeddings)?;
        let (labels, distinct) = compact_labels(&raw);
        if distinct < 2 {
            debug!(k, n, "k skipped: single cluster");
            continue;
        }

        let (Some(silhouette), Some(dbi)) = (
            silhouette_score(embeddings, &labels),
            davies_bouldin_index(embeddings, &labels),
        ) else {
            debug!(k, n, distinct, "k skipped: quality metrics undefined");
            continue;
        };

        let score = combined_score(silhouette, dbi);
        debug!(k, distinct, silhouette, dbi, score, "k evaluated");

        if best.as_ref().map_or(true, |b| score > b.score) {
            best = Some(Selection {
                k: distinct,
                labels,
                silhouette,
                dbi,
                score,
            });
        }
    }

    Ok(best)
}

/// Renumber labels to `0..distinct`, preserving the relative order of the
/// original label values.
pub fn compact_labels(labels: &[usize]) -> (Vec<usize>, usize) {
    let Some(&max) = labels.iter().max() else {
        return (Vec::new(), 0);
    };
    let mut used = vec![false; max + 1];
    for &l in labels {
        used[l] = true;
    }
    let mut remap = vec![0usize; max + 1];
    let mut next = 0;
    for (label, &is_used) in used.iter().enumerate() {
        if is_used {
            remap[label] = next;
            next += 1;
        }
    }
    (labels.iter().map(|&l| remap[l]).collect(), next)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blobs(centers: &[(f32, f32)], per: usize) -> Vec<Vec<f32>> {
        centers
            .iter()
            .flat_map(|&(x, y)| {
                (0..per).map(move |i| vec![x + (i as f32) * 0.01, y - (i as f32) * 0.01])
            })
            .collect()
    }

    #[test]
    fn score_is_bounded() {
        assert!((combined_score(1.0, 0.0) - 1.0).abs() < 1e-12);
        assert!((combined_score(-1.0, 1e12)).abs() < 1e-6);
    }

    #[test]
    fn finds_three_well_separated_blobs() {
        let data = blobs(&[(0.0, 0.0), (20.0, 0.0), (0.0, 20.0)], 6);
        let sel = select_k(&data, 2..=5, 42, 100, &CancellationToken::new())
            .unwrap()
            .unwrap();
        assert_eq!(sel.k, 3);
        let groups = sel.groups();
        assert!(groups.iter().all(|g| g.len() == 6));
        assert!(groups.iter().all(|g| g.windows(2).all(|w| w[0] < w[1])));
    }

    #[test]
    fn identical_points_have_no_valid_k() {
        let data = vec![vec![1.0, 1.0]; 5];
        let sel = select_k(&data, 2..=5, 42, 100, &CancellationToken::new()).unwrap();
        assert!(sel.is_none());
    }

    #[test]
    fn candidates_at_or_above_n_are_ignored() {
        let data = vec![vec![0.0], vec![1.0]];
        assert!(select_k(&data, 2..=5, 42, 100, &CancellationToken::new())
            .unwrap()
            .is_none());
    }

    #[test]
    fn cancellation_stops_selection() {
        let token = CancellationToken::new();
        token.cancel();
        let data = blobs(&[(0.0, 0.0), (5.0, 5.0)], 4);
        assert!(matches!(
            select_k(&data, 2..=5, 42, 100, &token),
            Err(RaptorError::Cancelled)
        ));
    }

    #[test]
    fn compaction_preserves_order() {
        assert_eq!(compact_labels(&[4, 1, 4, 1]), (vec![1, 0, 1, 0], 2));
        assert_eq!(compact_labels(&[]), (vec![], 0));
    }
}
