//! Lexical scoring: how many distinct query tokens occur in a node's text.

use std::collections::BTreeSet;

use crate::index::IndexedNode;

/// Distinct lowercased whitespace-separated tokens of `query`.
pub fn query_tokens(query: &str) -> BTreeSet<String> {
    query.to_lowercase().split_whitespace().map(str::to_string).collect()
}

/// Nodes containing at least one query token as a substring, by
/// descending token count.
pub fn keyword_scores(nodes: &[IndexedNode], query: &str) -> Vec<(usize, u32)> {
    let tokens = query_tokens(query);
    if tokens.is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<(usize, u32)> = nodes
        .iter()
        .enumerate()
        .filter_map(|(pos, node)| {
            let score = tokens
                .iter()
                .filter(|t| node.text_lower.contains(t.as_str()))
                .count() as u32;
            (score > 0).then_some((pos, score))
        })
        .collect();

    // Stable: equal scores stay in index order.
    scored.sort_by(|a, b| b.1.cmp(&a.1));
    scored
}
