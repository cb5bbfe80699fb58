/// Treg RAPTOR system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Number of differentiation stages known to the vocabulary (levels 0..=7).
pub const STAGE_COUNT: usize = 8;

/// Preferred id of the tree root; `root_<n>` when a document is named `root`.
pub const ROOT_NODE_ID: &str = "root";

/// Prefix for generated interior node ids.
pub const INTERIOR_NODE_PREFIX: &str = "node_";

/// Character bound applied to `content` and `summary` in persisted trees.
pub const PERSISTED_TEXT_LIMIT: usize = 500;

/// Character bound for text excerpts returned in search hits.
pub const HIT_EXCERPT_CHARS: usize = 200;

/// Tracing span names, one per subsystem.
pub mod spans {
    pub const BUILD: &str = "raptor.build";
    pub const EMBEDDING: &str = "raptor.embedding";
    pub const CLUSTER: &str = "raptor.cluster";
    pub const RETRIEVAL: &str = "raptor.retrieval";
    pub const INGEST: &str = "raptor.ingest";
}
