//! Property tests for embedding determinism.

use proptest::prelude::*;

use raptor_core::config::EmbeddingConfig;
use raptor_embeddings::{cosine_similarity, EmbeddingEngine};

fn engine() -> EmbeddingEngine {
    EmbeddingEngine::new(EmbeddingConfig {
        dimensions: 96,
        batch_size: 3,
        cache_dir: std::env::temp_dir().display().to_string(),
        ..Default::default()
    })
    .unwrap()
}

proptest! {
    #[test]
    fn embed_many_is_byte_identical(texts in prop::collection::vec("[a-zA-Z0-9 +-]{1,60}[a-z]", 1..12)) {
        let e = engine();
        let a = e.embed_many(&texts).unwrap();
        let b = e.embed_many(&texts).unwrap();
        let bits = |m: &Vec<Vec<f32>>| -> Vec<u32> { m.iter().flatten().map(|x| x.to_bits()).collect() };
        prop_assert_eq!(bits(&a), bits(&b));
    }

    #[test]
    fn cosine_is_bounded(a in prop::collection::vec(-10.0f32..10.0, 8), b in prop::collection::vec(-10.0f32..10.0, 8)) {
        let sim = cosine_similarity(&a, &b);
        prop_assert!((-1.0..=1.0).contains(&sim));
    }
}
