//! Hashed TF-IDF provider.
//!
//! Generates fixed-dimension vectors by hashing terms into buckets and
//! weighting by term frequency. Deterministic across runs and platforms,
//! so it doubles as the reference provider for tests.

use std::collections::BTreeMap;

use rayon::prelude::*;

use raptor_core::errors::RaptorResult;
use raptor_core::traits::IEmbeddingProvider;

/// Hashed TF-IDF embedding provider.
pub struct HashedTfIdfProvider {
    dimensions: usize,
    model_id: String,
}

impl HashedTfIdfProvider {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            model_id: format!("hashed-tfidf-{dimensions}"),
        }
    }

    /// Hash a term into a bucket index using FNV-1a.
    fn hash_term(term: &str, dims: usize) -> usize {
        let mut h: u64 = 0xcbf29ce484222325;
        for b in term.as_bytes() {
            h ^= *b as u64;
            h = h.wrapping_mul(0x100000001b3);
        }
        (h % dims as u64) as usize
    }

    /// Lowercase alphanumeric terms of at least two characters.
    fn tokenize(text: &str) -> Vec<String> {
        text.split(|c: char| !c.is_alphanumeric() && c != '_')
            .filter(|s| s.chars().count() >= 2)
            .map(|s| s.to_lowercase())
            .collect()
    }

    fn vectorize(&self, text: &str) -> Vec<f32> {
        let tokens = Self::tokenize(text);
        let mut vec = vec![0.0f32; self.dimensions];
        if tokens.is_empty() {
            return vec;
        }

        // Ordered map: bucket sums must accumulate in the same order every run.
        let mut tf: BTreeMap<&str, f32> = BTreeMap::new();
        for tok in &tokens {
            *tf.entry(tok.as_str()).or_default() += 1.0;
        }

        let total = tokens.len() as f32;
        for (term, count) in &tf {
            let freq = count / total;
            // Longer terms are rarer; short ones are mostly stopwords.
            let idf = 1.0 + (term.chars().count() as f32).ln();
            vec[Self::hash_term(term, self.dimensions)] += freq * idf;
        }

        let norm: f32 = vec.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > f32::EPSILON {
            for v in &mut vec {
                *v /= norm;
            }
        }
        vec
    }
}

impl IEmbeddingProvider for HashedTfIdfProvider {
    fn embed(&self, text: &str) -> RaptorResult<Vec<f32>> {
        Ok(self.vectorize(text))
    }

    fn embed_batch(&self, texts: &[String]) -> RaptorResult<Vec<Vec<f32>>> {
        Ok(texts.par_iter().map(|t| self.vectorize(t)).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        &self.model_id
    }

    fn is_available(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::similarity::cosine_similarity;

    #[test]
    fn empty_text_returns_zero_vector() {
        let p = HashedTfIdfProvider::new(128);
        let v = p.embed("").unwrap();
        assert_eq!(v.len(), 128);
        assert!(v.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn output_is_unit_norm() {
        let p = HashedTfIdfProvider::new(256);
        let v = p.embed("Foxp3 expression in thymic regulatory cells").unwrap();
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5, "expected unit norm, got {norm}");
    }

    #[test]
    fn batch_matches_individual() {
        let p = HashedTfIdfProvider::new(128);
        let texts = vec!["IL-10 secretion".to_string(), "bone marrow niche".to_string()];
        let batch = p.embed_batch(&texts).unwrap();
        for (i, text) in texts.iter().enumerate() {
            assert_eq!(batch[i], p.embed(text).unwrap());
        }
    }

    #[test]
    fn related_abstracts_are_closer() {
        let p = HashedTfIdfProvider::new(384);
        let a = p.embed("Foxp3 transcription factor stability").unwrap();
        let b = p.embed("Foxp3 expression and TSDR stability").unwrap();
        let c = p.embed("hematopoietic stem cell niche").unwrap();
        assert!(cosine_similarity(&a, &b) > cosine_similarity(&a, &c));
    }

    #[test]
    fn model_id_encodes_dimensions() {
        assert_eq!(HashedTfIdfProvider::new(64).name(), "hashed-tfidf-64");
    }
}
