//! Corpus intake: loading documents, stage classification, labels and
//! Level-0 balancing.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use raptor_core::config::IntakeConfig;
use raptor_core::constants::STAGE_COUNT;
use raptor_core::errors::{PersistError, RaptorError, RaptorResult};
use raptor_core::models::{ClassifiedDocument, Document, DocumentMetadata, StageLevel};
use raptor_vocab::{generate_label, StageClassifier};

/// Classified documents ready for embedding, in intake order.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedCorpus {
    pub documents: Vec<ClassifiedDocument>,
    /// Count per stage level, all eight levels present.
    pub level_distribution: BTreeMap<u8, usize>,
    /// Level-0 documents removed by balancing.
    pub dropped_level_0: usize,
}

impl ClassifiedCorpus {
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn ids(&self) -> Vec<String> {
        self.documents.iter().map(|d| d.document.id.clone()).collect()
    }

    pub fn texts(&self) -> Vec<String> {
        self.documents.iter().map(|d| d.document.text.clone()).collect()
    }

    pub fn plain_documents(&self) -> Vec<Document> {
        self.documents.iter().map(|d| d.document.clone()).collect()
    }

    pub fn levels(&self) -> Vec<u8> {
        self.documents.iter().map(|d| d.level.index()).collect()
    }

    pub fn labels(&self) -> Vec<String> {
        self.documents.iter().map(|d| d.label.clone()).collect()
    }

    pub fn metadata(&self) -> Vec<DocumentMetadata> {
        self.documents.iter().map(DocumentMetadata::from).collect()
    }
}

pub struct CorpusIntake {
    classifier: StageClassifier,
    config: IntakeConfig,
}

impl CorpusIntake {
    pub fn new(classifier: StageClassifier, config: IntakeConfig) -> Self {
        Self { classifier, config }
    }

    pub fn classifier(&self) -> &StageClassifier {
        &self.classifier
    }

    /// Validate, classify and label `documents`, then cap Level 0 at
    /// `level_0_limit` with a seeded sample. Survivors keep input order.
    pub fn classify(&self, documents: Vec<Document>) -> RaptorResult<ClassifiedCorpus> {
        if documents.is_empty() {
            return Err(RaptorError::invalid_input("corpus is empty"));
        }
        let mut seen = BTreeSet::new();
        for doc in &documents {
            doc.validate()?;
            if !seen.insert(doc.id.as_str()) {
                return Err(RaptorError::invalid_input(format!(
                    "duplicate document id {}",
                    doc.id
                )));
            }
        }

        let vocab = self.classifier.vocabulary();
        let classified: Vec<ClassifiedDocument> = documents
            .into_iter()
            .enumerate()
            .map(|(idx, document)| {
                let level = self.classifier.determine_level(&document.text);
                let label = generate_label(vocab, &document.text, level, idx, 1);
                ClassifiedDocument {
                    document,
                    level,
                    label,
                }
            })
            .collect();

        let before = classified.len();
        let (documents, dropped_level_0) = self.balance_level_0(classified);
        let level_distribution = level_distribution(&documents);
        info!(
            documents = documents.len(),
            dropped_level_0,
            before,
            "corpus classified"
        );
        for (level, count) in &level_distribution {
            debug!(level, count, "level distribution");
        }

        Ok(ClassifiedCorpus {
            documents,
            level_distribution,
            dropped_level_0,
        })
    }

    fn balance_level_0(
        &self,
        documents: Vec<ClassifiedDocument>,
    ) -> (Vec<ClassifiedDocument>, usize) {
        let level_0: Vec<usize> = documents
            .iter()
            .enumerate()
            .filter(|(_, d)| d.level == StageLevel::Hsc)
            .map(|(i, _)| i)
            .collect();
        let limit = self.config.level_0_limit;
        if level_0.len() <= limit {
            return (documents, 0);
        }

        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let keep: BTreeSet<usize> = rand::seq::index::sample(&mut rng, level_0.len(), limit)
            .into_iter()
            .map(|i| level_0[i])
            .collect();
        let dropped = level_0.len() - limit;
        info!(
            level_0 = level_0.len(),
            limit,
            seed = self.config.seed,
            "level 0 down-sampled"
        );

        let kept = documents
            .into_iter()
            .enumerate()
            .filter(|(i, d)| d.level != StageLevel::Hsc || keep.contains(i))
            .map(|(_, d)| d)
            .collect();
        (kept, dropped)
    }
}

/// Count per level, with every level present.
pub fn level_distribution(documents: &[ClassifiedDocument]) -> BTreeMap<u8, usize> {
    let mut counts: BTreeMap<u8, usize> = (0..STAGE_COUNT as u8).map(|l| (l, 0)).collect();
    for doc in documents {
        *counts.entry(doc.level.index()).or_insert(0) += 1;
    }
    counts
}

/// Read every `*.json` (array of documents) and `*.txt` (one document,
/// id = file stem) file directly under `dir`, in path order.
pub fn load_corpus_dir(dir: &Path) -> RaptorResult<Vec<Document>> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file())
        .collect();
    paths.sort();

    let mut documents = Vec::new();
    for path in paths {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => {
                let raw = fs::read_to_string(&path)?;
                let docs: Vec<Document> =
                    serde_json::from_str(&raw).map_err(|e| PersistError::Malformed {
                        path: path.display().to_string(),
                        reason: e.to_string(),
                    })?;
                debug!(path = %path.display(), documents = docs.len(), "corpus file loaded");
                documents.extend(docs);
            }
            Some("txt") => {
                let stem = path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .ok_or_else(|| PersistError::UnsupportedCorpusFile {
                        path: path.display().to_string(),
                    })?;
                let text = fs::read_to_string(&path)?;
                documents.push(Document::new(stem, text.trim())?);
            }
            _ => debug!(path = %path.display(), "skipping non-corpus file"),
        }
    }

    info!(dir = %dir.display(), documents = documents.len(), "corpus directory loaded");
    Ok(documents)
}
