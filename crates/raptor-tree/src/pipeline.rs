//! RaptorPipeline: intake → embed → cluster/summarize → persist.
//!
//! Every stage's failure is tagged with its [`BuildStage`], so a failed
//! build surfaces exactly one error with a stage. A pipeline runs one
//! build at a time; a concurrent call fails with `BuildInProgress`.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, info_span};

use raptor_core::cancel::CancellationToken;
use raptor_core::config::RaptorConfig;
use raptor_core::constants::spans;
use raptor_core::errors::{BuildStage, ClusterError, RaptorError, RaptorResult};
use raptor_core::models::Document;
use raptor_embeddings::{corpus_fingerprint, verify_embeddings, EmbeddingEngine, NodeInfo};
use raptor_vocab::StageClassifier;

use crate::builder::TreeBuilder;
use crate::intake::{load_corpus_dir, ClassifiedCorpus, CorpusIntake};
use crate::persist::{save_document_metadata, save_tree, timestamp_now, PersistedTree};
use crate::summarizer::TextRankSummarizer;
use crate::tree::RaptorTree;

/// Vectors used for the pairwise statistics logged after embedding.
const EMBEDDING_STATS_SAMPLE: usize = 100;

/// Everything a successful build produced.
#[derive(Debug, Clone)]
pub struct BuildOutput {
    pub corpus: ClassifiedCorpus,
    pub tree: RaptorTree,
    /// Fingerprint of the corpus, used as the embedding cache key.
    pub corpus_id: String,
    pub build_time_seconds: f64,
}

impl BuildOutput {
    pub fn to_persisted(&self, scale: &str, timestamp: String) -> PersistedTree {
        PersistedTree::new(
            &self.tree,
            &self.corpus,
            scale,
            self.build_time_seconds,
            timestamp,
        )
    }
}

/// Files written by [`RaptorPipeline::build_and_persist`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedPaths {
    pub tree: PathBuf,
    pub documents: PathBuf,
}

pub struct RaptorPipeline {
    intake: CorpusIntake,
    embeddings: EmbeddingEngine,
    builder: TreeBuilder,
    /// Guard: only one build can run at a time.
    is_running: Arc<AtomicBool>,
    cancel: CancellationToken,
}

impl RaptorPipeline {
    /// Pipeline with the built-in vocabulary, the configured embedding
    /// provider and the TextRank summarizer.
    pub fn new(config: &RaptorConfig) -> RaptorResult<Self> {
        config.validate()?;
        let embeddings = EmbeddingEngine::new(config.embedding.clone())?;
        let builder = TreeBuilder::new(
            config.tree.clone(),
            Box::new(TextRankSummarizer::new(config.tree.summary_sentences)),
        );
        let intake = CorpusIntake::new(StageClassifier::default(), config.intake.clone());
        Ok(Self::from_parts(intake, embeddings, builder))
    }

    pub fn from_parts(
        intake: CorpusIntake,
        embeddings: EmbeddingEngine,
        builder: TreeBuilder,
    ) -> Self {
        Self {
            intake,
            embeddings,
            builder,
            is_running: Arc::new(AtomicBool::new(false)),
            cancel: CancellationToken::new(),
        }
    }

    /// Token that aborts the running build before its next k-means run.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn is_running(&self) -> bool {
        self.is_running.load(Ordering::Relaxed)
    }

    pub fn embeddings(&self) -> &EmbeddingEngine {
        &self.embeddings
    }

    /// Build a tree over `documents`.
    pub fn build(&self, documents: Vec<Document>) -> RaptorResult<BuildOutput> {
        if self
            .is_running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(RaptorError::BuildInProgress);
        }

        let result = self.run(documents);

        self.is_running.store(false, Ordering::SeqCst);
        result
    }

    /// Load every corpus file under `dir` and build over it.
    pub fn build_from_dir(&self, dir: &Path) -> RaptorResult<BuildOutput> {
        let documents = load_corpus_dir(dir).map_err(|e| e.at_stage(BuildStage::Ingest))?;
        self.build(documents)
    }

    /// Build, then write `enhanced_treg_raptor_<scale>_<ts>.json` and
    /// `treg_documents_<scale>_<ts>.json` into `out_dir`.
    pub fn build_and_persist(
        &self,
        documents: Vec<Document>,
        out_dir: &Path,
        scale: &str,
    ) -> RaptorResult<(BuildOutput, PersistedPaths)> {
        let output = self.build(documents)?;
        let paths =
            persist_output(&output, out_dir, scale).map_err(|e| e.at_stage(BuildStage::Persist))?;
        Ok((output, paths))
    }

    fn run(&self, documents: Vec<Document>) -> RaptorResult<BuildOutput> {
        let _span = info_span!(spans::BUILD, documents = documents.len()).entered();
        let start = Instant::now();

        let corpus = self
            .intake
            .classify(documents)
            .map_err(|e| e.at_stage(BuildStage::Ingest))?;

        let (corpus_id, vectors) = self
            .embed(&corpus)
            .map_err(|e| e.at_stage(BuildStage::Embed))?;

        let tree = self
            .builder
            .build(&corpus.plain_documents(), &vectors, &self.cancel)
            .map_err(|e| e.at_stage(BuildStage::Cluster))?;

        let build_time_seconds = start.elapsed().as_secs_f64();
        info!(
            corpus = %corpus_id,
            documents = corpus.len(),
            nodes = tree.len(),
            depth = tree.depth(),
            seconds = build_time_seconds,
            "build complete"
        );

        Ok(BuildOutput {
            corpus,
            tree,
            corpus_id,
            build_time_seconds,
        })
    }

    fn embed(&self, corpus: &ClassifiedCorpus) -> RaptorResult<(String, Vec<Vec<f32>>)> {
        let ids = corpus.ids();
        let texts = corpus.texts();
        let corpus_id = corpus_fingerprint(&ids, &texts);
        let info: Vec<NodeInfo> = ids
            .iter()
            .zip(&texts)
            .map(|(id, text)| NodeInfo::document(id, text.chars().count()))
            .collect();

        let cached = self.embeddings.load_or_build(&corpus_id, &info, &texts)?;
        if cached.len() != corpus.len() {
            return Err(ClusterError::LengthMismatch {
                documents: corpus.len(),
                embeddings: cached.len(),
            }
            .into());
        }
        let stats = verify_embeddings(&cached.vectors, EMBEDDING_STATS_SAMPLE)?;
        debug!(
            dimensions = stats.dimensions,
            mean_norm = stats.mean_norm,
            mean_pairwise_cosine = stats.mean_pairwise_cosine,
            "embedding statistics"
        );
        Ok((corpus_id, cached.vectors))
    }
}

/// Write the tree and document metadata for `output` into `out_dir`.
pub fn persist_output(
    output: &BuildOutput,
    out_dir: &Path,
    scale: &str,
) -> RaptorResult<PersistedPaths> {
    let timestamp = timestamp_now();
    let paths = PersistedPaths {
        tree: out_dir.join(format!("enhanced_treg_raptor_{scale}_{timestamp}.json")),
        documents: out_dir.join(format!("treg_documents_{scale}_{timestamp}.json")),
    };
    save_tree(&paths.tree, &output.to_persisted(scale, timestamp))?;
    save_document_metadata(&paths.documents, &output.corpus.metadata())?;
    Ok(paths)
}
