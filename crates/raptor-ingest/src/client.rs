//! Blocking PubMed E-utilities client.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use raptor_core::config::IngestConfig;
use raptor_core::errors::{IngestError, RaptorError, RaptorResult};

use crate::article::Article;
use crate::cache::ArticleCache;
use crate::rate_limit::RateLimiter;
use crate::xml::{parse_articles, parse_search_ids};

/// Where article records come from. Implementations are shared across
/// collection workers.
pub trait ArticleSource: Send + Sync {
    /// Ids matching `query`, at most `max_results`.
    fn search(&self, query: &str, max_results: usize) -> RaptorResult<Vec<String>>;

    /// Records for `ids` that have an abstract.
    fn fetch_articles(&self, ids: &[String]) -> RaptorResult<Vec<Article>>;
}

fn http_err(e: reqwest::Error) -> RaptorError {
    IngestError::Http {
        reason: e.to_string(),
    }
    .into()
}

pub struct PubMedClient {
    client: reqwest::blocking::Client,
    config: IngestConfig,
    limiter: Arc<RateLimiter>,
    cache: ArticleCache,
}

impl PubMedClient {
    pub fn new(config: IngestConfig) -> RaptorResult<Self> {
        let limiter = Arc::new(RateLimiter::new(Duration::from_millis(config.request_gap_ms)));
        Self::with_limiter(config, limiter)
    }

    /// Client sharing `limiter` with other clients.
    pub fn with_limiter(config: IngestConfig, limiter: Arc<RateLimiter>) -> RaptorResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true)
            .build()
            .map_err(http_err)?;
        let cache = ArticleCache::new(&config.cache_dir);
        Ok(Self {
            client,
            config,
            limiter,
            cache,
        })
    }

    pub fn cache(&self) -> &ArticleCache {
        &self.cache
    }

    fn endpoint(&self, name: &str) -> String {
        format!("{}/{name}", self.config.base_url.trim_end_matches('/'))
    }

    fn get(&self, endpoint: &str, params: &[(&str, String)]) -> RaptorResult<String> {
        let mut params = params.to_vec();
        params.push(("tool", self.config.tool.clone()));
        if let Some(email) = &self.config.email {
            params.push(("email", email.clone()));
        }

        self.limiter.wait();
        let response = self
            .client
            .get(self.endpoint(endpoint))
            .query(&params)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(http_err)?;
        response.text().map_err(http_err)
    }

    fn fetch_batch(&self, batch: &[String]) -> RaptorResult<Vec<Article>> {
        let body = self.get(
            "efetch.fcgi",
            &[
                ("db", "pubmed".to_string()),
                ("id", batch.join(",")),
                ("retmode", "xml".to_string()),
            ],
        )?;
        Ok(parse_articles(&body)?)
    }
}

impl ArticleSource for PubMedClient {
    fn search(&self, query: &str, max_results: usize) -> RaptorResult<Vec<String>> {
        let body = self.get(
            "esearch.fcgi",
            &[
                ("db", "pubmed".to_string()),
                ("term", query.to_string()),
                ("retmax", max_results.to_string()),
                ("retmode", "xml".to_string()),
            ],
        )?;
        let ids = parse_search_ids(&body)?;
        info!(query, ids = ids.len(), "pubmed search");
        Ok(ids)
    }

    /// Fetch in batches, pausing `fetch_gap_ms` before each call. A failed
    /// batch is logged and skipped; the combined result is cached only when
    /// every batch succeeded.
    fn fetch_articles(&self, ids: &[String]) -> RaptorResult<Vec<Article>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        if let Some(articles) = self.cache.load(ids) {
            info!(ids = ids.len(), articles = articles.len(), "articles loaded from cache");
            return Ok(articles);
        }

        let batch_size = self.config.batch_size.max(1);
        let batches = ids.len().div_ceil(batch_size);
        let mut articles = Vec::new();
        let mut failed = 0usize;
        for (i, batch) in ids.chunks(batch_size).enumerate() {
            thread::sleep(Duration::from_millis(self.config.fetch_gap_ms));
            match self.fetch_batch(batch) {
                Ok(found) => {
                    debug!(batch = i + 1, batches, articles = found.len(), "batch fetched");
                    articles.extend(found);
                }
                Err(e) => {
                    failed += 1;
                    warn!(batch = i + 1, batches, error = %e, "batch fetch failed");
                }
            }
        }

        if failed == 0 {
            self.cache.store(ids, &articles)?;
        }
        Ok(articles)
    }
}
