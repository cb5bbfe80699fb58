//! In-memory query embedding cache using moka.

use std::time::Duration;

use moka::sync::Cache;

/// Query embeddings keyed by blake3 hash of `(model id, query)`.
pub struct QueryCache {
    cache: Cache<String, Vec<f32>>,
}

impl QueryCache {
    pub fn new(max_entries: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_entries)
            .time_to_idle(Duration::from_secs(3600))
            .build();
        Self { cache }
    }

    pub fn key(model_id: &str, query: &str) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(model_id.as_bytes());
        hasher.update(&[0]);
        hasher.update(query.as_bytes());
        hasher.finalize().to_hex().to_string()
    }

    pub fn get(&self, key: &str) -> Option<Vec<f32>> {
        self.cache.get(key)
    }

    pub fn insert(&self, key: String, embedding: Vec<f32>) {
        self.cache.insert(key, embedding);
    }

    pub fn clear(&self) {
        self.cache.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_get() {
        let cache = QueryCache::new(10);
        let key = QueryCache::key("m", "Foxp3");
        cache.insert(key.clone(), vec![1.0, 2.0]);
        assert_eq!(cache.get(&key), Some(vec![1.0, 2.0]));
        cache.clear();
        assert_eq!(cache.get(&key), None);
    }

    #[test]
    fn keys_depend_on_model() {
        assert_ne!(QueryCache::key("a", "q"), QueryCache::key("b", "q"));
    }
}
