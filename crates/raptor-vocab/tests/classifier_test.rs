use raptor_core::models::StageLevel;
use raptor_vocab::{generate_label, MatchedRule, StageClassifier, VocabularyConfig};

#[test]
fn oracle_cases_classify_exactly() {
    let classifier = StageClassifier::default();
    let cases = [
        ("thymic treg natural regulatory cells", 4),
        ("induced treg peripheral conversion TGF-beta", 7),
        ("foxp3 positive regulatory", 5),
        ("il-10 secreting suppressive function regulatory", 6),
        ("common lymphoid progenitor IL-7R+ Flt3+", 1),
        ("hematopoietic stem cell self-renewal bone marrow niche", 0),
    ];
    for (text, expected) in cases {
        assert_eq!(
            classifier.determine_level(text).index(),
            expected,
            "misclassified: {text}"
        );
    }
}

#[test]
fn synthetic_corpus_matches_annotations() {
    let classifier = StageClassifier::default();
    for doc in test_fixtures::annotated_corpus() {
        assert_eq!(
            classifier.determine_level(&doc.text),
            doc.expected_level,
            "{} misclassified",
            doc.id
        );
    }
}

#[test]
fn rules_fire_in_priority_order() {
    let classifier = StageClassifier::default();
    let c = classifier.classify("thymic treg with TSDR demethylation and foxp3+ phenotype");
    assert_eq!(c.rule, MatchedRule::Foxp3Specific);

    let c = classifier.classify("natural treg and induced treg compared");
    assert_eq!(c.rule, MatchedRule::ThymicSpecific);

    let c = classifier.classify("regulatory T cells from the thymus");
    assert_eq!(c.rule, MatchedRule::ContextThymic);
    assert_eq!(c.level, StageLevel::NTreg);

    let c = classifier.classify("CD25+ regulatory T cells in lymph nodes");
    assert_eq!(c.rule, MatchedRule::ContextDefault);
}

#[test]
fn injected_vocabulary_changes_behavior() {
    let mut vocab = VocabularyConfig::default();
    vocab.itreg_specific.push("Colonic Treg".into());
    let classifier = StageClassifier::new(vocab);
    assert_eq!(
        classifier.determine_level("colonic treg expansion"),
        StageLevel::ITreg
    );
    assert_eq!(
        StageClassifier::default().determine_level("colonic treg expansion"),
        StageLevel::Hsc
    );
}

#[test]
fn labels_for_corpus_use_stage_names() {
    let classifier = StageClassifier::default();
    let vocab = classifier.vocabulary();
    for doc in test_fixtures::annotated_corpus() {
        let level = classifier.determine_level(&doc.text);
        let label = generate_label(vocab, &doc.text, level, 0, 1);
        assert!(label.starts_with(&vocab.profile(level).name));
        assert!(label.ends_with("(n=1)"));
    }
}
