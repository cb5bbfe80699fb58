//! Per-stage literature collection on a bounded worker pool.
//!
//! One job runs per stage level. Each job searches its queries in order,
//! fetches the hits and keeps articles it has not seen yet. Jobs dedupe
//! locally; results are merged in level order at join time, so an article
//! found by two levels is kept by the lower one. Failed queries are logged
//! and skipped.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, info_span, warn};

use raptor_core::cancel::CancellationToken;
use raptor_core::config::IngestConfig;
use raptor_core::constants::spans;
use raptor_core::errors::{IngestError, RaptorError, RaptorResult};

use crate::article::CollectedArticle;
use crate::client::ArticleSource;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedQuery {
    pub level: u8,
    pub query: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollectionReport {
    /// Unique articles in level order.
    pub articles: Vec<CollectedArticle>,
    /// Articles kept per queried level, zero counts included.
    pub per_level: BTreeMap<u8, usize>,
    pub failed_queries: Vec<FailedQuery>,
    /// Articles dropped at merge because a lower level already had them.
    pub cross_level_duplicates: usize,
}

impl CollectionReport {
    /// Every queried level yielded at least one article.
    pub fn is_complete(&self) -> bool {
        !self.per_level.is_empty() && self.per_level.values().all(|&n| n > 0)
    }
}

struct LevelOutcome {
    level: u8,
    articles: Vec<CollectedArticle>,
    failed: Vec<FailedQuery>,
}

pub struct LevelCollector<'a> {
    source: &'a dyn ArticleSource,
    config: IngestConfig,
    cancel: CancellationToken,
}

impl<'a> LevelCollector<'a> {
    pub fn new(source: &'a dyn ArticleSource, config: IngestConfig) -> Self {
        Self {
            source,
            config,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Run one job per entry of `queries` on `max_workers` threads.
    pub fn collect(&self, queries: &BTreeMap<u8, Vec<String>>) -> RaptorResult<CollectionReport> {
        let _span = info_span!(
            spans::INGEST,
            levels = queries.len(),
            workers = self.config.max_workers
        )
        .entered();

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.max_workers.max(1))
            .build()
            .map_err(|e| IngestError::WorkerPool {
                reason: e.to_string(),
            })?;

        let jobs: Vec<(u8, &[String])> = queries.iter().map(|(l, q)| (*l, q.as_slice())).collect();
        let outcomes: Vec<RaptorResult<LevelOutcome>> = pool.install(|| {
            jobs.par_iter()
                .map(|(level, queries)| self.collect_level(*level, queries))
                .collect()
        });

        let mut report = CollectionReport::default();
        let mut seen: HashSet<String> = HashSet::new();
        for outcome in outcomes {
            let outcome = outcome?;
            let mut kept = 0;
            for article in outcome.articles {
                if seen.insert(article.article.pmid.clone()) {
                    report.articles.push(article);
                    kept += 1;
                } else {
                    report.cross_level_duplicates += 1;
                }
            }
            info!(level = outcome.level, articles = kept, "level collected");
            report.per_level.insert(outcome.level, kept);
            report.failed_queries.extend(outcome.failed);
        }

        info!(
            articles = report.articles.len(),
            failed_queries = report.failed_queries.len(),
            complete = report.is_complete(),
            "collection finished"
        );
        Ok(report)
    }

    fn collect_level(&self, level: u8, queries: &[String]) -> RaptorResult<LevelOutcome> {
        let cap = (level == 0).then_some(self.config.level_0_max);
        let mut local_seen: BTreeSet<String> = BTreeSet::new();
        let mut articles = Vec::new();
        let mut failed = Vec::new();

        for query in queries {
            if self.cancel.is_cancelled() {
                return Err(RaptorError::Cancelled);
            }
            if let Some(cap) = cap.filter(|&c| articles.len() >= c) {
                info!(level, cap, "level cap reached");
                break;
            }

            let fetched = self
                .source
                .search(query, self.config.max_results_per_query)
                .and_then(|ids| self.source.fetch_articles(&ids));
            let fetched = match fetched {
                Ok(fetched) => fetched,
                Err(e) => {
                    warn!(level, query = %query, error = %e, "query failed");
                    failed.push(FailedQuery {
                        level,
                        query: query.clone(),
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            for article in fetched {
                if cap.is_some_and(|c| articles.len() >= c) {
                    break;
                }
                if local_seen.insert(article.pmid.clone()) {
                    articles.push(CollectedArticle {
                        article,
                        expected_level: level,
                        query: query.clone(),
                    });
                }
            }
        }

        Ok(LevelOutcome {
            level,
            articles,
            failed,
        })
    }
}
