//! Query execution over a [`RetrievalIndex`].

use tracing::{debug, info_span};

use raptor_core::config::RetrievalConfig;
use raptor_core::constants::{spans, HIT_EXCERPT_CHARS};
use raptor_core::errors::RaptorResult;
use raptor_core::text::{is_blank, truncate_chars};
use raptor_embeddings::EmbeddingEngine;

use crate::hit::{HitScore, SearchHit, SearchMode};
use crate::index::RetrievalIndex;
use crate::search::{fuse, keyword_scores, semantic_scores};

pub struct RetrievalEngine<'a> {
    index: &'a RetrievalIndex,
    embeddings: &'a EmbeddingEngine,
    config: RetrievalConfig,
}

impl<'a> RetrievalEngine<'a> {
    /// `embeddings` must be the engine the index was built with, so that
    /// queries land in the same vector space as the nodes.
    pub fn new(
        index: &'a RetrievalIndex,
        embeddings: &'a EmbeddingEngine,
        config: RetrievalConfig,
    ) -> Self {
        Self {
            index,
            embeddings,
            config,
        }
    }

    pub fn index(&self) -> &RetrievalIndex {
        self.index
    }

    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    pub fn search(
        &self,
        mode: SearchMode,
        query: &str,
        top_k: usize,
    ) -> RaptorResult<Vec<SearchHit>> {
        let _span = info_span!(spans::RETRIEVAL, %mode, top_k).entered();
        let hits = match mode {
            SearchMode::Keyword => self.keyword_search(query, top_k),
            SearchMode::Semantic => self.semantic_search(query, top_k)?,
            SearchMode::Hybrid => self.hybrid_search(query, top_k)?,
        };
        debug!(hits = hits.len(), "search complete");
        Ok(hits)
    }

    pub fn keyword_search(&self, query: &str, top_k: usize) -> Vec<SearchHit> {
        keyword_scores(self.index.nodes(), query)
            .into_iter()
            .take(top_k)
            .map(|(pos, score)| self.hit(pos, HitScore::Keyword { score }))
            .collect()
    }

    pub fn semantic_search(&self, query: &str, top_k: usize) -> RaptorResult<Vec<SearchHit>> {
        if is_blank(query) || top_k == 0 {
            return Ok(Vec::new());
        }
        let ranked = self.rank_semantic(query)?;
        Ok(ranked
            .into_iter()
            .take(top_k)
            .map(|(pos, similarity)| self.hit(pos, HitScore::Semantic { similarity }))
            .collect())
    }

    pub fn hybrid_search(&self, query: &str, top_k: usize) -> RaptorResult<Vec<SearchHit>> {
        if is_blank(query) || top_k == 0 {
            return Ok(Vec::new());
        }
        let pool = self.config.candidate_pool;
        let mut keyword = keyword_scores(self.index.nodes(), query);
        keyword.truncate(pool);
        let mut semantic = self.rank_semantic(query)?;
        semantic.truncate(pool);

        let fused = fuse(
            &keyword,
            &semantic,
            self.config.keyword_weight,
            self.config.semantic_weight,
        );
        Ok(fused
            .into_iter()
            .take(top_k)
            .map(|h| {
                self.hit(
                    h.position,
                    HitScore::Hybrid {
                        hybrid: h.hybrid,
                        keyword_norm: h.keyword_norm,
                        semantic: h.semantic,
                    },
                )
            })
            .collect())
    }

    fn rank_semantic(&self, query: &str) -> RaptorResult<Vec<(usize, f64)>> {
        if self.index.is_empty() {
            return Ok(Vec::new());
        }
        let vector = self.embeddings.embed_query(query)?;
        Ok(semantic_scores(self.index.embeddings(), &vector))
    }

    fn hit(&self, position: usize, score: HitScore) -> SearchHit {
        let node = &self.index.nodes()[position];
        SearchHit {
            node_id: node.node_id.clone(),
            level: node.level,
            is_leaf: node.is_leaf,
            text: truncate_chars(&node.text, HIT_EXCERPT_CHARS).to_string(),
            score,
        }
    }
}
