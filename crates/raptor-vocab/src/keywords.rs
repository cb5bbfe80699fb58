use raptor_core::models::StageLevel;

use crate::vocabulary::VocabularyConfig;

/// Maximum number of keywords returned per text.
pub const MAX_LEVEL_KEYWORDS: usize = 5;

/// Markers and keywords of `level`'s profile that occur in `text`,
/// lowercased, in profile order (markers first), without duplicates.
pub fn extract_level_keywords(
    vocab: &VocabularyConfig,
    text: &str,
    level: StageLevel,
) -> Vec<String> {
    let t = text.to_lowercase();
    let profile = vocab.profile(level);
    let mut found: Vec<String> = Vec::new();
    for term in profile.markers.iter().chain(profile.keywords.iter()) {
        let term = term.to_lowercase();
        if t.contains(&term) && !found.contains(&term) {
            found.push(term);
            if found.len() == MAX_LEVEL_KEYWORDS {
                break;
            }
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_follow_profile_order() {
        let vocab = VocabularyConfig::default();
        let found = extract_level_keywords(
            &vocab,
            "Multipotent stem cell self-renewal in bone marrow of Lin- Sca-1+ mice",
            StageLevel::Hsc,
        );
        assert_eq!(
            found,
            vec!["lin-", "sca-1+", "stem cell", "multipotent", "self-renewal"]
        );
    }

    #[test]
    fn no_keywords_for_unrelated_text() {
        let vocab = VocabularyConfig::default();
        assert!(extract_level_keywords(&vocab, "weather report", StageLevel::Clp).is_empty());
    }
}
