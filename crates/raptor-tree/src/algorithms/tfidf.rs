//! TF-IDF key phrases that distinguish a cluster's documents.

use std::collections::{BTreeMap, BTreeSet};

/// Top `limit` terms by TF-IDF over `documents`, highest first. Equal
/// scores are ordered by term so the output is deterministic.
///
/// `idf = ln(n_docs / df) + 1`; term frequency is pooled over all documents.
pub fn extract_key_phrases(documents: &[String], limit: usize) -> Vec<(String, f64)> {
    if documents.is_empty() || limit == 0 {
        return Vec::new();
    }

    let n_docs = documents.len() as f64;
    let tokenized: Vec<Vec<String>> = documents.iter().map(|d| tokenize(d)).collect();

    let mut df: BTreeMap<&str, usize> = BTreeMap::new();
    let mut tf: BTreeMap<&str, usize> = BTreeMap::new();
    let mut total_terms = 0usize;
    for tokens in &tokenized {
        let unique: BTreeSet<&str> = tokens.iter().map(String::as_str).collect();
        for term in unique {
            *df.entry(term).or_insert(0) += 1;
        }
        for token in tokens {
            *tf.entry(token.as_str()).or_insert(0) += 1;
            total_terms += 1;
        }
    }
    if total_terms == 0 {
        return Vec::new();
    }

    let mut scores: Vec<(String, f64)> = tf
        .iter()
        .filter_map(|(term, &count)| {
            let doc_freq = *df.get(term)? as f64;
            let term_freq = count as f64 / total_terms as f64;
            let idf = (n_docs / doc_freq).ln() + 1.0;
            Some((term.to_string(), term_freq * idf))
        })
        .collect();

    scores.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    scores.truncate(limit);
    scores
}

/// Lowercase words longer than two characters, stop words removed.
/// Marker punctuation (`-`, `+`) is kept so `il-10` and `cd25+` survive.
fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|w| {
            w.chars()
                .filter(|c| c.is_alphanumeric() || matches!(c, '-' | '+'))
                .collect::<String>()
                .trim_matches('-')
                .to_lowercase()
        })
        .filter(|w| w.chars().count() > 2 && !is_stop_word(w))
        .collect()
}

fn is_stop_word(word: &str) -> bool {
    matches!(
        word,
        "the"
            | "and"
            | "for"
            | "are"
            | "but"
            | "not"
            | "all"
            | "can"
            | "was"
            | "were"
            | "has"
            | "have"
            | "been"
            | "from"
            | "this"
            | "that"
            | "with"
            | "which"
            | "their"
            | "its"
            | "into"
            | "more"
            | "other"
            | "these"
            | "those"
            | "than"
            | "also"
            | "both"
            | "such"
            | "via"
            | "during"
            | "between"
            | "within"
            | "cells"
            | "cell"
            | "study"
            | "results"
            | "showed"
            | "here"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_marker_ranks_high() {
        let docs = vec![
            "Foxp3 controls regulatory programs".to_string(),
            "Foxp3 stability depends on TSDR demethylation".to_string(),
            "IL-10 secretion by Foxp3 positive populations".to_string(),
        ];
        let phrases = extract_key_phrases(&docs, 3);
        assert_eq!(phrases[0].0, "foxp3");
    }

    #[test]
    fn keeps_marker_punctuation() {
        let phrases = extract_key_phrases(&["IL-10 and CD25+ markers".to_string()], 5);
        let terms: Vec<&str> = phrases.iter().map(|(t, _)| t.as_str()).collect();
        assert!(terms.contains(&"il-10"));
        assert!(terms.contains(&"cd25+"));
    }

    #[test]
    fn empty_documents_return_empty() {
        assert!(extract_key_phrases(&[], 5).is_empty());
    }

    #[test]
    fn respects_limit_and_is_deterministic() {
        let docs = vec!["alpha beta gamma delta epsilon zeta eta theta".to_string()];
        let a = extract_key_phrases(&docs, 3);
        assert_eq!(a.len(), 3);
        assert_eq!(a, extract_key_phrases(&docs, 3));
        // All tie; alphabetical order wins.
        assert_eq!(a[0].0, "alpha");
    }
}
