//! TextRank: sentences as nodes, cosine similarity of term-count vectors
//! as edge weights, PageRank iteration to score them.

use std::collections::BTreeMap;

use super::sentence_splitter::split_sentences;

/// Damping factor for PageRank iteration.
const DAMPING: f64 = 0.85;
/// Convergence threshold.
const CONVERGENCE: f64 = 1e-6;
/// Maximum iterations.
const MAX_ITERATIONS: usize = 100;

/// Top `num_sentences` sentences of `text` by TextRank score, restored to
/// their original order and joined with spaces.
///
/// Equal scores keep the earlier sentence.
pub fn summarize(text: &str, num_sentences: usize) -> String {
    let sentences = split_sentences(text);
    if sentences.is_empty() || num_sentences == 0 {
        return String::new();
    }
    if sentences.len() <= num_sentences {
        return sentences.join(" ");
    }

    let scores = rank_sentences(&sentences);
    let mut indexed: Vec<(usize, f64)> = scores.into_iter().enumerate().collect();
    indexed.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

    let mut top: Vec<usize> = indexed
        .iter()
        .take(num_sentences)
        .map(|(i, _)| *i)
        .collect();
    top.sort_unstable();

    top.iter()
        .map(|&i| sentences[i].as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// One PageRank score per sentence.
pub fn rank_sentences(sentences: &[String]) -> Vec<f64> {
    let n = sentences.len();
    match n {
        0 => return Vec::new(),
        1 => return vec![1.0],
        _ => {}
    }

    let vectors = term_vectors(sentences);
    let mut sim = vec![vec![0.0f64; n]; n];
    for i in 0..n {
        for j in (i + 1)..n {
            let s = sparse_cosine(&vectors[i], &vectors[j]);
            sim[i][j] = s;
            sim[j][i] = s;
        }
    }
    let out_weight: Vec<f64> = sim.iter().map(|row| row.iter().sum()).collect();

    let mut scores = vec![1.0 / n as f64; n];
    for _ in 0..MAX_ITERATIONS {
        let mut next = vec![0.0f64; n];
        let mut max_diff = 0.0f64;
        for i in 0..n {
            let mut sum = 0.0;
            for j in 0..n {
                if i != j && out_weight[j] > f64::EPSILON {
                    sum += sim[j][i] * scores[j] / out_weight[j];
                }
            }
            next[i] = (1.0 - DAMPING) / n as f64 + DAMPING * sum;
            max_diff = max_diff.max((next[i] - scores[i]).abs());
        }
        scores = next;
        if max_diff < CONVERGENCE {
            break;
        }
    }
    scores
}

/// Lowercased word counts per sentence, punctuation stripped from word edges.
fn term_vectors(sentences: &[String]) -> Vec<BTreeMap<String, f64>> {
    sentences
        .iter()
        .map(|s| {
            let mut counts = BTreeMap::new();
            for word in s.split_whitespace() {
                let w = word
                    .trim_matches(|c: char| !c.is_alphanumeric())
                    .to_lowercase();
                if !w.is_empty() {
                    *counts.entry(w).or_insert(0.0) += 1.0;
                }
            }
            counts
        })
        .collect()
}

fn sparse_cosine(a: &BTreeMap<String, f64>, b: &BTreeMap<String, f64>) -> f64 {
    let dot: f64 = a
        .iter()
        .filter_map(|(term, x)| b.get(term).map(|y| x * y))
        .sum();
    let norm_a = a.values().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.values().map(|x| x * x).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ABSTRACT: &str = "Regulatory T cells express Foxp3. \
        Foxp3 expression in regulatory T cells is stabilized by TSDR demethylation. \
        The weather was pleasant. \
        Loss of Foxp3 in regulatory T cells causes autoimmunity.";

    #[test]
    fn picks_central_sentences_in_original_order() {
        let summary = summarize(ABSTRACT, 2);
        assert!(!summary.contains("weather"));
        assert!(summary.starts_with("Regulatory") || summary.starts_with("Foxp3"));
    }

    #[test]
    fn short_text_is_returned_whole() {
        assert_eq!(summarize("One sentence here.", 3), "One sentence here.");
    }

    #[test]
    fn empty_text_gives_empty_summary() {
        assert!(summarize("", 2).is_empty());
    }

    #[test]
    fn scores_are_positive_and_deterministic() {
        let sentences: Vec<String> = ["Tregs suppress.", "Tregs regulate.", "Cats sleep."]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let a = rank_sentences(&sentences);
        assert_eq!(a.len(), 3);
        assert!(a.iter().all(|&s| s > 0.0));
        assert_eq!(a, rank_sentences(&sentences));
    }
}
