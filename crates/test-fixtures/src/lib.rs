//! Test fixture loader for the synthetic Treg corpora used across crates.
//!
//! Fixture files live under `fixtures/` next to this crate's manifest.

use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use raptor_core::models::{Document, StageLevel};

/// Relative path of the 27-abstract corpus spanning every stage level.
pub const TREG_CORPUS_27: &str = "corpus/treg_synthetic_27.json";

/// A corpus entry annotated with the stage it was written to exercise.
#[derive(Debug, Clone, Deserialize)]
pub struct AnnotatedDocument {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub title: Option<String>,
    pub expected_level: StageLevel,
}

impl AnnotatedDocument {
    pub fn to_document(&self) -> Document {
        Document {
            id: self.id.clone(),
            text: self.text.clone(),
            external_id: None,
            title: self.title.clone(),
        }
    }
}

/// Root directory of the fixture files.
pub fn fixtures_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

/// Load and deserialize a JSON fixture file.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let path = fixture_path(relative_path);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}

/// Get the absolute path to a fixture file.
pub fn fixture_path(relative_path: &str) -> PathBuf {
    fixtures_root().join(relative_path)
}

/// The annotated 27-abstract corpus.
pub fn annotated_corpus() -> Vec<AnnotatedDocument> {
    load_fixture(TREG_CORPUS_27)
}

/// The 27-abstract corpus as plain documents, in file order.
pub fn treg_corpus() -> Vec<Document> {
    annotated_corpus().iter().map(|d| d.to_document()).collect()
}

/// `count` distinct HSC-only abstracts, for intake balancing tests.
pub fn hsc_only_corpus(count: usize) -> Vec<Document> {
    (0..count)
        .map(|i| Document {
            id: format!("hsc_{i}"),
            text: format!(
                "Hematopoietic stem cell self-renewal study {i} in the bone marrow niche \
                 tracks quiescence of long-term HSC clone {}.",
                i * 7 + 3
            ),
            external_id: None,
            title: None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corpus_has_27_unique_documents() {
        let docs = treg_corpus();
        assert_eq!(docs.len(), 27);
        let mut ids: Vec<_> = docs.iter().map(|d| d.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 27);
        assert!(docs.iter().all(|d| d.validate().is_ok()));
    }

    #[test]
    fn corpus_annotations_span_every_stage() {
        let corpus = annotated_corpus();
        for level in StageLevel::ALL {
            assert!(
                corpus.iter().any(|d| d.expected_level == level),
                "no fixture for {level}"
            );
        }
    }
}
