//! Content-addressed cache of fetched articles.
//!
//! One JSON file per requested id set, named
//! `articles_<md5 of the sorted ids joined by ",">.json`, so the same set
//! requested in any order hits the same file.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use raptor_core::errors::RaptorResult;

use crate::article::Article;

#[derive(Debug, Clone)]
pub struct ArticleCache {
    dir: PathBuf,
}

impl ArticleCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn key(ids: &[String]) -> String {
        let mut sorted: Vec<&str> = ids.iter().map(String::as_str).collect();
        sorted.sort_unstable();
        format!("{:x}", md5::compute(sorted.join(",")))
    }

    pub fn path_for(&self, ids: &[String]) -> PathBuf {
        self.dir.join(format!("articles_{}.json", Self::key(ids)))
    }

    /// Cached articles for `ids`. A missing or unreadable file is a miss.
    pub fn load(&self, ids: &[String]) -> Option<Vec<Article>> {
        let path = self.path_for(ids);
        let raw = fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&raw) {
            Ok(articles) => {
                debug!(path = %path.display(), ids = ids.len(), "article cache hit");
                Some(articles)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "corrupt article cache entry ignored");
                None
            }
        }
    }

    pub fn store(&self, ids: &[String], articles: &[Article]) -> RaptorResult<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(ids);
        fs::write(&path, serde_json::to_string_pretty(articles)?)?;
        debug!(path = %path.display(), articles = articles.len(), "article cache stored");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn key_ignores_id_order() {
        assert_eq!(
            ArticleCache::key(&ids(&["3", "1", "2"])),
            ArticleCache::key(&ids(&["1", "2", "3"]))
        );
        // md5("1,2,3")
        assert_eq!(ArticleCache::key(&ids(&["1", "2", "3"])), "55b84a9d317184fe61224bfb4a060fb0");
    }

    #[test]
    fn round_trips_and_tolerates_corruption() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ArticleCache::new(dir.path());
        let key = ids(&["7"]);
        assert!(cache.load(&key).is_none());

        let articles = vec![Article {
            pmid: "7".into(),
            title: "T".into(),
            abstract_text: "A".into(),
        }];
        cache.store(&key, &articles).unwrap();
        assert_eq!(cache.load(&key).unwrap(), articles);

        fs::write(cache.path_for(&key), "{broken").unwrap();
        assert!(cache.load(&key).is_none());
    }
}
