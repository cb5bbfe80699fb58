//! Weighted fusion of keyword and semantic candidates.
//!
//! Keyword scores are divided by the best keyword score of the query;
//! semantic scores are used as they are. A node missing from one channel
//! gets 0 for it. With non-negative similarities every hybrid score lies
//! in `[0, w_kw + w_sem]`.

use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HybridScore {
    pub position: usize,
    pub hybrid: f64,
    pub keyword_norm: f64,
    pub semantic: f64,
}

/// Fuse ranked keyword and semantic candidates. Output is sorted by
/// descending hybrid score; ties keep index order.
pub fn fuse(
    keyword: &[(usize, u32)],
    semantic: &[(usize, f64)],
    keyword_weight: f64,
    semantic_weight: f64,
) -> Vec<HybridScore> {
    let max_keyword = keyword.iter().map(|(_, s)| *s).max().unwrap_or(0);

    // position -> (keyword_norm, semantic)
    let mut channels: BTreeMap<usize, (f64, f64)> = BTreeMap::new();
    if max_keyword > 0 {
        for &(pos, score) in keyword {
            channels.entry(pos).or_default().0 = score as f64 / max_keyword as f64;
        }
    }
    for &(pos, similarity) in semantic {
        channels.entry(pos).or_default().1 = similarity;
    }

    let mut fused: Vec<HybridScore> = channels
        .into_iter()
        .map(|(position, (keyword_norm, semantic))| HybridScore {
            position,
            hybrid: keyword_weight * keyword_norm + semantic_weight * semantic,
            keyword_norm,
            semantic,
        })
        .collect();
    fused.sort_by(|a, b| b.hybrid.total_cmp(&a.hybrid));
    fused
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blends_normalized_keyword_with_semantic() {
        let keyword = vec![(0, 4), (2, 2)];
        let semantic = vec![(1, 0.9), (2, 0.5)];
        let fused = fuse(&keyword, &semantic, 0.4, 0.6);

        let by_pos: BTreeMap<usize, HybridScore> =
            fused.iter().map(|h| (h.position, *h)).collect();
        assert!((by_pos[&0].hybrid - 0.4).abs() < 1e-12);
        assert!((by_pos[&1].hybrid - 0.54).abs() < 1e-12);
        assert!((by_pos[&2].hybrid - (0.4 * 0.5 + 0.6 * 0.5)).abs() < 1e-12);
        assert_eq!(by_pos[&1].keyword_norm, 0.0);
        assert_eq!(by_pos[&0].semantic, 0.0);
        assert!(fused.windows(2).all(|w| w[0].hybrid >= w[1].hybrid));
    }

    #[test]
    fn no_keyword_hits_leaves_scaled_semantic() {
        let fused = fuse(&[], &[(0, 0.8), (1, 0.2)], 0.4, 0.6);
        assert_eq!(fused.len(), 2);
        assert!((fused[0].hybrid - 0.48).abs() < 1e-12);
        assert!((fused[1].hybrid - 0.12).abs() < 1e-12);
    }
}
