//! # raptor-core
//!
//! Foundation crate for the Treg RAPTOR tree system.
//! Defines the shared types, traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod cancel;
pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod text;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use cancel::CancellationToken;
pub use config::RaptorConfig;
pub use errors::{BuildStage, RaptorError, RaptorResult};
pub use models::{ClassifiedDocument, ClusteringStats, Document, StageLevel, TreeNode};
