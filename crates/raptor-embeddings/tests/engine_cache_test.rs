//! Failure-mode tests for the on-disk embedding cache.

use std::fs;

use raptor_core::config::EmbeddingConfig;
use raptor_embeddings::cache::artifact;
use raptor_embeddings::{corpus_fingerprint, EmbeddingEngine, NodeInfo};

fn engine(dir: &std::path::Path) -> EmbeddingEngine {
    EmbeddingEngine::new(EmbeddingConfig {
        dimensions: 128,
        cache_dir: dir.display().to_string(),
        ..Default::default()
    })
    .unwrap()
}

fn corpus() -> (Vec<NodeInfo>, Vec<String>) {
    let docs = test_fixtures::treg_corpus();
    let info = docs
        .iter()
        .map(|d| NodeInfo::document(&d.id, d.text.chars().count()))
        .collect();
    let texts = docs.into_iter().map(|d| d.text).collect();
    (info, texts)
}

#[test]
fn second_call_hits_the_cache() {
    let dir = tempfile::tempdir().unwrap();
    let e = engine(dir.path());
    let (info, texts) = corpus();

    let first = e.load_or_build("corpus", &info, &texts).unwrap();
    let path = e.cache().path_for("corpus", e.model_id());
    let written = fs::metadata(&path).unwrap().modified().unwrap();

    let second = e.load_or_build("corpus", &info, &texts).unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::metadata(&path).unwrap().modified().unwrap(), written);
    assert_eq!(second.len(), 27);
}

#[test]
fn random_bytes_are_recovered_by_rebuilding() {
    let dir = tempfile::tempdir().unwrap();
    let e = engine(dir.path());
    let (info, texts) = corpus();

    let good = e.load_or_build("corpus", &info, &texts).unwrap();
    let path = e.cache().path_for("corpus", e.model_id());
    let garbage: Vec<u8> = (0..4096u32).map(|i| (i.wrapping_mul(2654435761) >> 13) as u8).collect();
    fs::write(&path, garbage).unwrap();

    let rebuilt = e.load_or_build("corpus", &info, &texts).unwrap();
    assert_eq!(good, rebuilt);
    // The replacement artifact decodes cleanly.
    let bytes = fs::read(&path).unwrap();
    assert_eq!(artifact::decode(&bytes).unwrap(), rebuilt);
}

#[test]
fn length_mismatch_invalidates_and_rebuilds() {
    let dir = tempfile::tempdir().unwrap();
    let e = engine(dir.path());
    let (info, texts) = corpus();

    e.load_or_build("corpus", &info[..10], &texts[..10]).unwrap();
    let full = e.load_or_build("corpus", &info, &texts).unwrap();
    assert_eq!(full.len(), 27);
    assert_eq!(full.node_ids[26], "doc_26");
}

#[test]
fn cache_files_are_keyed_by_corpus_and_model() {
    let dir = tempfile::tempdir().unwrap();
    let e = engine(dir.path());
    let (info, texts) = corpus();
    let ids: Vec<String> = info.iter().map(|n| n.node_id.clone()).collect();
    let fp = corpus_fingerprint(&ids, &texts);

    e.load_or_build(&fp, &info, &texts).unwrap();
    let name = format!("embeddings_{fp}_hashed-tfidf-128.bin");
    assert!(dir.path().join(name).exists());
}

#[test]
fn mismatched_info_and_texts_fail_fast() {
    let dir = tempfile::tempdir().unwrap();
    let e = engine(dir.path());
    let (info, texts) = corpus();
    assert!(e.load_or_build("corpus", &info[..3], &texts).is_err());
}
