//! # raptor-tree
//!
//! Builds the RAPTOR tree: corpus intake and stage classification,
//! recursive k-means partitioning with silhouette/Davies–Bouldin k
//! selection, extractive summaries for interior nodes, validation and
//! JSON persistence.
//!
//! [`RaptorPipeline`] runs the whole build and tags any failure with the
//! stage it escaped from.

pub mod algorithms;
pub mod builder;
pub mod intake;
pub mod persist;
pub mod pipeline;
pub mod selection;
pub mod summarizer;
pub mod tree;

pub use builder::TreeBuilder;
pub use intake::{load_corpus_dir, ClassifiedCorpus, CorpusIntake};
pub use persist::{load_tree, save_document_metadata, save_tree, timestamp_now, PersistedTree};
pub use pipeline::{persist_output, BuildOutput, PersistedPaths, RaptorPipeline};
pub use selection::{select_k, Selection};
pub use summarizer::TextRankSummarizer;
pub use tree::RaptorTree;
