//! EmbeddingEngine: the main entry point for raptor-embeddings.
//!
//! Wraps one provider with the on-disk corpus cache and the in-memory
//! query cache. All methods take `&self`; the engine is shared by the
//! build pipeline and the retrieval engine.

use tracing::{debug, info, info_span, warn};

use raptor_core::config::EmbeddingConfig;
use raptor_core::constants::spans;
use raptor_core::errors::{EmbeddingError, RaptorError, RaptorResult};
use raptor_core::text::is_blank;
use raptor_core::traits::IEmbeddingProvider;

use crate::cache::{CachedEmbeddings, EmbeddingCache, NodeInfo, QueryCache};
use crate::providers;

pub struct EmbeddingEngine {
    provider: Box<dyn IEmbeddingProvider>,
    cache: EmbeddingCache,
    queries: QueryCache,
    config: EmbeddingConfig,
}

impl EmbeddingEngine {
    /// Create the provider named in `config`. Model load failure is fatal.
    pub fn new(config: EmbeddingConfig) -> RaptorResult<Self> {
        let provider = providers::create_provider(&config)?;
        Ok(Self::with_provider(provider, config))
    }

    /// Use an already-constructed provider.
    pub fn with_provider(provider: Box<dyn IEmbeddingProvider>, config: EmbeddingConfig) -> Self {
        info!(
            provider = provider.name(),
            dims = provider.dimensions(),
            cache_dir = %config.cache_dir,
            "EmbeddingEngine initialized"
        );
        Self {
            cache: EmbeddingCache::new(&config.cache_dir),
            queries: QueryCache::new(config.query_cache_size),
            provider,
            config,
        }
    }

    pub fn model_id(&self) -> &str {
        self.provider.name()
    }

    pub fn dimensions(&self) -> usize {
        self.provider.dimensions()
    }

    pub fn cache(&self) -> &EmbeddingCache {
        &self.cache
    }

    /// Embed one non-blank text.
    pub fn embed_one(&self, text: &str) -> RaptorResult<Vec<f32>> {
        if is_blank(text) {
            return Err(EmbeddingError::EmptyText.into());
        }
        let vector = self.provider.embed(text)?;
        self.check_dimensions(&vector)?;
        Ok(vector)
    }

    /// Embed many texts in provider batches, preserving input order.
    pub fn embed_many(&self, texts: &[String]) -> RaptorResult<Vec<Vec<f32>>> {
        if texts.iter().any(|t| is_blank(t)) {
            return Err(EmbeddingError::EmptyText.into());
        }
        let batch_size = self.config.batch_size.max(1);
        let mut out = Vec::with_capacity(texts.len());
        for chunk in texts.chunks(batch_size) {
            let vectors = self.provider.embed_batch(chunk)?;
            if vectors.len() != chunk.len() {
                return Err(EmbeddingError::InferenceFailed {
                    reason: format!(
                        "provider returned {} vectors for {} texts",
                        vectors.len(),
                        chunk.len()
                    ),
                }
                .into());
            }
            for v in &vectors {
                self.check_dimensions(v)?;
            }
            out.extend(vectors);
        }
        Ok(out)
    }

    /// Embed a query, memoized in the in-memory cache.
    pub fn embed_query(&self, query: &str) -> RaptorResult<Vec<f32>> {
        let key = QueryCache::key(self.model_id(), query);
        if let Some(vector) = self.queries.get(&key) {
            return Ok(vector);
        }
        let vector = self.embed_one(query)?;
        self.queries.insert(key, vector.clone());
        Ok(vector)
    }

    /// Return cached embeddings for `corpus_id` or compute and store them.
    ///
    /// A cached artifact is reused only when it matches the requested node
    /// ids, the model and its dimension. A stale artifact is replaced; a
    /// corrupted one is deleted with a warning and rebuilt.
    pub fn load_or_build(
        &self,
        corpus_id: &str,
        node_info: &[NodeInfo],
        texts: &[String],
    ) -> RaptorResult<CachedEmbeddings> {
        let _span = info_span!(spans::EMBEDDING, corpus = corpus_id, texts = texts.len()).entered();

        if node_info.len() != texts.len() {
            return Err(RaptorError::invalid_input(format!(
                "{} node records for {} texts",
                node_info.len(),
                texts.len()
            )));
        }

        let path = self.cache.path_for(corpus_id, self.model_id());
        match self.cache.load(&path) {
            Ok(Some(cached)) => {
                if self.is_reusable(&cached, node_info) {
                    info!(path = %path.display(), rows = cached.len(), "embedding cache hit");
                    return Ok(cached);
                }
                warn!(
                    path = %path.display(),
                    cached_rows = cached.len(),
                    wanted_rows = texts.len(),
                    "embedding cache is stale, rebuilding"
                );
                self.cache.invalidate(&path)?;
            }
            Ok(None) => debug!(path = %path.display(), "embedding cache miss"),
            Err(RaptorError::EmbeddingError(EmbeddingError::CacheCorrupted { reason, .. })) => {
                warn!(path = %path.display(), %reason, "embedding cache corrupted, rebuilding");
                self.cache.invalidate(&path)?;
            }
            Err(e) => return Err(e),
        }

        let vectors = self.embed_many(texts)?;
        let built = CachedEmbeddings {
            model_id: self.model_id().to_string(),
            dimensions: self.dimensions(),
            node_ids: node_info.iter().map(|n| n.node_id.clone()).collect(),
            node_info: node_info.to_vec(),
            vectors,
        };
        self.cache.store(&path, &built)?;
        info!(path = %path.display(), rows = built.len(), "embeddings built and cached");
        Ok(built)
    }

    fn is_reusable(&self, cached: &CachedEmbeddings, node_info: &[NodeInfo]) -> bool {
        cached.len() == node_info.len()
            && cached.model_id == self.model_id()
            && cached.dimensions == self.dimensions()
            && cached
                .node_ids
                .iter()
                .zip(node_info)
                .all(|(id, info)| *id == info.node_id)
    }

    fn check_dimensions(&self, vector: &[f32]) -> RaptorResult<()> {
        let expected = self.dimensions();
        if vector.len() != expected {
            return Err(EmbeddingError::DimensionMismatch {
                expected,
                actual: vector.len(),
            }
            .into());
        }
        Ok(())
    }
}
