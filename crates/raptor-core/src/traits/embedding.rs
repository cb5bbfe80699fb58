use crate::errors::RaptorResult;

/// Embedding generation provider.
pub trait IEmbeddingProvider: Send + Sync {
    /// Embed a single text, returning a vector of floats.
    fn embed(&self, text: &str) -> RaptorResult<Vec<f32>>;

    /// Embed a batch of texts, preserving input order.
    fn embed_batch(&self, texts: &[String]) -> RaptorResult<Vec<Vec<f32>>>;

    /// The dimensionality of embeddings produced by this provider.
    fn dimensions(&self) -> usize;

    /// Model identifier. Part of the embedding cache key.
    fn name(&self) -> &str;

    /// Whether this provider is currently available.
    fn is_available(&self) -> bool;
}
