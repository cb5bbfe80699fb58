//! On-disk embedding artifacts, one per (corpus fingerprint, model id).
//!
//! The cache is single-writer: concurrent builders against the same key
//! are not supported. Writes go to a temporary file and are renamed into
//! place so readers never observe a half-written artifact.

pub mod artifact;
mod query_cache;

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use raptor_core::errors::{EmbeddingError, RaptorResult};

pub use query_cache::QueryCache;

/// Descriptor stored alongside each cached vector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeInfo {
    pub node_id: String,
    /// Tree depth, for tree-node vectors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tree_level: Option<u32>,
    pub is_leaf: bool,
    pub text_chars: usize,
}

impl NodeInfo {
    /// Info for a raw corpus document.
    pub fn document(id: &str, text_chars: usize) -> Self {
        Self {
            node_id: id.to_string(),
            tree_level: None,
            is_leaf: true,
            text_chars,
        }
    }

    /// Info for a node of a built tree.
    pub fn tree_node(id: &str, level: u32, is_leaf: bool, text_chars: usize) -> Self {
        Self {
            node_id: id.to_string(),
            tree_level: Some(level),
            is_leaf,
            text_chars,
        }
    }
}

/// A matrix of embeddings with its parallel node ids and info records.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedEmbeddings {
    pub model_id: String,
    pub dimensions: usize,
    pub node_ids: Vec<String>,
    pub node_info: Vec<NodeInfo>,
    pub vectors: Vec<Vec<f32>>,
}

impl CachedEmbeddings {
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}

/// Directory of embedding artifacts.
#[derive(Debug, Clone)]
pub struct EmbeddingCache {
    dir: PathBuf,
}

impl EmbeddingCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `embeddings_<corpus>_<model>.bin`, with both parts made filename-safe.
    pub fn path_for(&self, corpus_id: &str, model_id: &str) -> PathBuf {
        self.dir.join(format!(
            "embeddings_{}_{}.bin",
            sanitize(corpus_id),
            sanitize(model_id)
        ))
    }

    /// `Ok(None)` when no artifact exists; `CacheCorrupted` when one exists
    /// but cannot be decoded.
    pub fn load(&self, path: &Path) -> RaptorResult<Option<CachedEmbeddings>> {
        if !path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(path)?;
        let cached = artifact::decode(&bytes).map_err(|reason| EmbeddingError::CacheCorrupted {
            path: path.display().to_string(),
            reason,
        })?;
        debug!(path = %path.display(), rows = cached.len(), "embedding artifact loaded");
        Ok(Some(cached))
    }

    pub fn store(&self, path: &Path, cached: &CachedEmbeddings) -> RaptorResult<()> {
        let bytes = artifact::encode(cached).map_err(|reason| EmbeddingError::CacheCorrupted {
            path: path.display().to_string(),
            reason,
        })?;
        fs::create_dir_all(&self.dir)?;
        let tmp = path.with_extension("bin.tmp");
        fs::write(&tmp, &bytes)?;
        fs::rename(&tmp, path)?;
        debug!(path = %path.display(), bytes = bytes.len(), "embedding artifact written");
        Ok(())
    }

    /// Remove an artifact. Missing files are not an error.
    pub fn invalidate(&self, path: &Path) -> RaptorResult<()> {
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

fn sanitize(part: &str) -> String {
    part.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect()
}
