//! Property tests for the staged classifier.

use proptest::prelude::*;

use raptor_vocab::StageClassifier;

const PHRASES: &[&str] = &[
    "foxp3+",
    "il-10",
    "immunosuppression",
    "thymic treg",
    "itreg",
    "cd25high cd127low",
    "regulatory t",
    "hsc",
    "self-renewal",
    "clp",
    "helper t cell",
    "tgf-β",
    "peripheral",
];

proptest! {
    #[test]
    fn classification_is_total(text in ".*") {
        let level = StageClassifier::default().determine_level(&text);
        prop_assert!(level.index() <= 7);
    }

    #[test]
    fn classification_is_deterministic(picks in prop::collection::vec(0..PHRASES.len(), 0..8)) {
        let text: Vec<&str> = picks.iter().map(|i| PHRASES[*i]).collect();
        let text = text.join(" ");
        let classifier = StageClassifier::default();
        prop_assert_eq!(classifier.classify(&text), classifier.classify(&text));
    }

    #[test]
    fn classification_ignores_case(picks in prop::collection::vec(0..PHRASES.len(), 1..6)) {
        let text: Vec<&str> = picks.iter().map(|i| PHRASES[*i]).collect();
        let text = text.join(" and ");
        let classifier = StageClassifier::default();
        prop_assert_eq!(
            classifier.determine_level(&text),
            classifier.determine_level(&text.to_uppercase())
        );
    }
}
