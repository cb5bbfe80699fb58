//! Dense scoring: cosine similarity against every node embedding.

use raptor_embeddings::cosine_similarity;

/// Every node's cosine similarity to `query`, highest first.
pub fn semantic_scores(embeddings: &[Vec<f32>], query: &[f32]) -> Vec<(usize, f64)> {
    let mut scored: Vec<(usize, f64)> = embeddings
        .iter()
        .enumerate()
        .map(|(pos, v)| (pos, cosine_similarity(query, v)))
        .collect();
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orders_by_similarity_with_stable_ties() {
        let embeddings = vec![vec![0.0, 1.0], vec![1.0, 0.0], vec![2.0, 0.0], vec![1.0, 1.0]];
        let scored = semantic_scores(&embeddings, &[1.0, 0.0]);
        let order: Vec<usize> = scored.iter().map(|(p, _)| *p).collect();
        assert_eq!(order, vec![1, 2, 3, 0]);
        assert!((scored[0].1 - 1.0).abs() < 1e-9);
    }

    #[test]
    fn zero_query_scores_zero_everywhere() {
        let scored = semantic_scores(&[vec![1.0, 2.0]], &[0.0, 0.0]);
        assert_eq!(scored, vec![(0, 0.0)]);
    }
}
