//! # raptor-ingest
//!
//! Literature collection for the RAPTOR corpus: a rate-limited PubMed
//! E-utilities client with an on-disk article cache, XML parsing of
//! esearch/efetch responses, and a bounded worker pool that runs one
//! collection job per differentiation stage.

pub mod article;
pub mod cache;
pub mod client;
pub mod collector;
pub mod queries;
pub mod rate_limit;
pub mod xml;

pub use article::{articles_to_documents, Article, CollectedArticle};
pub use cache::ArticleCache;
pub use client::{ArticleSource, PubMedClient};
pub use collector::{CollectionReport, FailedQuery, LevelCollector};
pub use queries::default_level_queries;
pub use rate_limit::RateLimiter;
