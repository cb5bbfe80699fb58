//! # raptor-vocab
//!
//! Rule-based classification of biomedical text into the eight Treg
//! differentiation stages, plus stage-specific labels and keywords.
//!
//! The classifier is a pure function of `(text, VocabularyConfig)`; all
//! phrase sets and stage profiles live in the injected config.

pub mod classifier;
pub mod keywords;
pub mod label;
pub mod vocabulary;

pub use classifier::{Classification, MatchedRule, StageClassifier};
pub use keywords::extract_level_keywords;
pub use label::{generate_label, validate_label, LabelIssue};
pub use vocabulary::{StageProfile, VocabularyConfig};
