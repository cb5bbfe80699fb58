//! Quality statistics over a set of embeddings.

use serde::Serialize;

use raptor_core::errors::{EmbeddingError, RaptorError, RaptorResult};

use crate::similarity::cosine_similarity;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbeddingStats {
    pub count: usize,
    pub dimensions: usize,
    pub mean_norm: f64,
    pub std_norm: f64,
    pub min_value: f32,
    pub max_value: f32,
    /// Number of leading vectors used for the pairwise statistics.
    pub sample_size: usize,
    pub mean_pairwise_cosine: f64,
    pub std_pairwise_cosine: f64,
}

/// Norm and value-range statistics over all vectors, plus pairwise cosine
/// statistics over the first `sample` vectors.
pub fn verify_embeddings(vectors: &[Vec<f32>], sample: usize) -> RaptorResult<EmbeddingStats> {
    let first = vectors
        .first()
        .ok_or_else(|| RaptorError::invalid_input("no embeddings to verify"))?;
    let dimensions = first.len();
    if let Some(bad) = vectors.iter().find(|v| v.len() != dimensions) {
        return Err(EmbeddingError::DimensionMismatch {
            expected: dimensions,
            actual: bad.len(),
        }
        .into());
    }

    let norms: Vec<f64> = vectors
        .iter()
        .map(|v| v.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt())
        .collect();
    let (mean_norm, std_norm) = mean_std(&norms);

    let (mut min_value, mut max_value) = (f32::INFINITY, f32::NEG_INFINITY);
    for x in vectors.iter().flatten() {
        min_value = min_value.min(*x);
        max_value = max_value.max(*x);
    }

    let sample_size = sample.min(vectors.len());
    let mut cosines = Vec::new();
    for i in 0..sample_size {
        for j in (i + 1)..sample_size {
            cosines.push(cosine_similarity(&vectors[i], &vectors[j]));
        }
    }
    let (mean_pairwise_cosine, std_pairwise_cosine) = mean_std(&cosines);

    Ok(EmbeddingStats {
        count: vectors.len(),
        dimensions,
        mean_norm,
        std_norm,
        min_value,
        max_value,
        sample_size,
        mean_pairwise_cosine,
        std_pairwise_cosine,
    })
}

fn mean_std(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, var.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_over_unit_vectors() {
        let vectors = vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![1.0, 0.0]];
        let stats = verify_embeddings(&vectors, 3).unwrap();
        assert_eq!(stats.count, 3);
        assert_eq!(stats.dimensions, 2);
        assert!((stats.mean_norm - 1.0).abs() < 1e-12);
        assert!(stats.std_norm.abs() < 1e-12);
        assert_eq!((stats.min_value, stats.max_value), (0.0, 1.0));
        // Pairs: (0,1)=0, (0,2)=1, (1,2)=0.
        assert!((stats.mean_pairwise_cosine - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn empty_and_ragged_inputs_fail() {
        assert!(verify_embeddings(&[], 5).is_err());
        assert!(verify_embeddings(&[vec![1.0], vec![1.0, 2.0]], 5).is_err());
    }
}
