//! Property tests: structural invariants of built trees.

use proptest::prelude::*;

use raptor_core::cancel::CancellationToken;
use raptor_core::config::{TreeConfig, TreeStrategy};
use raptor_core::models::Document;
use raptor_tree::{TextRankSummarizer, TreeBuilder};

fn documents(n: usize) -> Vec<Document> {
    (0..n)
        .map(|i| {
            let text = format!("Abstract {i} about regulatory T cells. Marker set {}.", i % 4);
            Document::new(format!("doc_{i}"), text).unwrap()
        })
        .collect()
}

fn strategy() -> impl Strategy<Value = TreeStrategy> {
    prop_oneof![Just(TreeStrategy::TopDown), Just(TreeStrategy::BottomUp)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn built_trees_satisfy_structural_invariants(
        embeddings in prop::collection::vec(prop::collection::vec(-1.0f32..1.0, 4), 1..40),
        max_cluster_size in 2usize..8,
        max_depth in 1u32..6,
        strategy in strategy(),
    ) {
        let n = embeddings.len();
        let config = TreeConfig {
            strategy,
            max_cluster_size,
            max_depth,
            ..Default::default()
        };
        let builder = TreeBuilder::new(config, Box::new(TextRankSummarizer::default()));
        let tree = builder
            .build(&documents(n), &embeddings, &CancellationToken::new())
            .unwrap();

        // Exactly one root; every other node has a parent that lists it.
        let roots: Vec<_> = tree.nodes().values().filter(|n| n.parent_id.is_none()).collect();
        prop_assert_eq!(roots.len(), 1);
        for node in tree.nodes().values() {
            if let Some(parent) = &node.parent_id {
                let parent = tree.node(parent).unwrap();
                prop_assert!(parent.children.contains(&node.node_id));
            }
            if !node.is_leaf {
                prop_assert!(!node.children.is_empty());
                prop_assert!(!node.summary.is_empty());
            }
        }

        // Sizes add up to the corpus.
        prop_assert_eq!(tree.root().cluster_size, n);
        let leaf_total: usize = tree.leaves().iter().map(|l| l.cluster_size).sum();
        prop_assert_eq!(leaf_total, n);
        prop_assert_eq!(tree.leaf_count(), n);
        prop_assert!(tree.depth() <= max_depth.max(1));
    }
}
