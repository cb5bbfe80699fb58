//! Staged classifier: maps free text to one of eight differentiation stages.
//!
//! Rules are evaluated most-mature-first so a text mentioning several
//! stages lands on the most specific functional signal. The precursor
//! rules only run when no general Treg context is present.

use serde::Serialize;

use raptor_core::models::StageLevel;

use crate::vocabulary::VocabularyConfig;

/// Functional score at or above which a text is Level 6.
const FUNCTIONAL_THRESHOLD: f64 = 2.0;
/// Weight of a general functional phrase hit.
const FUNCTIONAL_KEYWORD_WEIGHT: f64 = 0.5;

/// Which rule produced a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchedRule {
    FunctionalEvidence,
    Foxp3Specific,
    ThymicSpecific,
    InducedSpecific,
    SurfaceMarkers,
    HscSpecific,
    HscGeneral,
    ClpSpecific,
    Cd4Specific,
    ContextInduced,
    ContextThymic,
    ContextDefault,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Classification {
    pub level: StageLevel,
    pub rule: MatchedRule,
    pub functional_score: f64,
}

/// Pure function of `(text, VocabularyConfig)`.
#[derive(Debug, Clone)]
pub struct StageClassifier {
    vocab: VocabularyConfig,
}

impl Default for StageClassifier {
    fn default() -> Self {
        Self::new(VocabularyConfig::default())
    }
}

impl StageClassifier {
    pub fn new(vocab: VocabularyConfig) -> Self {
        Self {
            vocab: vocab.normalized(),
        }
    }

    pub fn vocabulary(&self) -> &VocabularyConfig {
        &self.vocab
    }

    /// Stage level for `text`. Empty text is Level 0.
    pub fn determine_level(&self, text: &str) -> StageLevel {
        self.classify(text).level
    }

    /// Classification along with the rule that fired.
    pub fn classify(&self, text: &str) -> Classification {
        let t = text.to_lowercase();
        let v = &self.vocab;

        let cytokine_hits = count_hits(&t, &v.functional_cytokines);
        let mechanism_hits = count_hits(&t, &v.functional_mechanisms);
        let keyword_hits = count_hits(&t, &v.functional_keywords);
        let functional_score = cytokine_hits as f64
            + mechanism_hits as f64
            + keyword_hits as f64 * FUNCTIONAL_KEYWORD_WEIGHT;

        let hit = |level, rule| Classification {
            level,
            rule,
            functional_score,
        };

        if functional_score >= FUNCTIONAL_THRESHOLD || (cytokine_hits > 0 && mechanism_hits > 0) {
            return hit(StageLevel::FunctionalTreg, MatchedRule::FunctionalEvidence);
        }

        if contains_any(&t, &v.foxp3_specific) {
            let has_stability =
                contains_any(&t, &v.stability_markers) || contains_any(&t, &v.transient_markers);
            if has_stability || functional_score < FUNCTIONAL_THRESHOLD {
                return hit(StageLevel::Foxp3Treg, MatchedRule::Foxp3Specific);
            }
        }

        if contains_any(&t, &v.ntreg_specific) {
            return hit(StageLevel::NTreg, MatchedRule::ThymicSpecific);
        }

        if contains_any(&t, &v.itreg_specific) {
            return hit(StageLevel::ITreg, MatchedRule::InducedSpecific);
        }

        if contains_any(&t, &v.surface_marker_combinations)
            && !contains_any(&t, &v.advanced_stage_markers)
        {
            return hit(StageLevel::Cd25Cd127Low, MatchedRule::SurfaceMarkers);
        }

        if !contains_any(&t, &v.treg_context) {
            if contains_any(&t, &v.hsc_specific) {
                return hit(StageLevel::Hsc, MatchedRule::HscSpecific);
            }
            if contains_any(&t, &v.hsc_general)
                && contains_any(&t, &v.hsc_context)
                && !contains_any(&t, &v.lymphoid_mentions)
            {
                return hit(StageLevel::Hsc, MatchedRule::HscGeneral);
            }
            if contains_any(&t, &v.clp_specific) && !contains_any(&t, &v.t_cell_mentions) {
                return hit(StageLevel::Clp, MatchedRule::ClpSpecific);
            }
            if contains_any(&t, &v.cd4_specific) {
                return hit(StageLevel::Cd4T, MatchedRule::Cd4Specific);
            }
        } else {
            if contains_any(&t, &v.itreg_cues) {
                return hit(StageLevel::ITreg, MatchedRule::ContextInduced);
            }
            if contains_any(&t, &v.ntreg_cues) {
                return hit(StageLevel::NTreg, MatchedRule::ContextThymic);
            }
            if contains_any(&t, &v.default_ntreg_cues) {
                return hit(StageLevel::NTreg, MatchedRule::ContextDefault);
            }
        }

        hit(StageLevel::Hsc, MatchedRule::Fallback)
    }
}

fn contains_any(text: &str, phrases: &[String]) -> bool {
    phrases.iter().any(|p| text.contains(p.as_str()))
}

fn count_hits(text: &str, phrases: &[String]) -> usize {
    phrases.iter().filter(|p| text.contains(p.as_str())).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(text: &str) -> u8 {
        StageClassifier::default().determine_level(text).index()
    }

    #[test]
    fn empty_text_is_level_zero() {
        let c = StageClassifier::default().classify("");
        assert_eq!(c.level, StageLevel::Hsc);
        assert_eq!(c.rule, MatchedRule::Fallback);
    }

    #[test]
    fn functional_requires_score_or_cytokine_with_mechanism() {
        // Cytokine alone scores 1.
        assert_ne!(level("il-35 levels were measured"), 6);
        // Cytokine plus mechanism.
        assert_eq!(level("il-35 and immunosuppression"), 6);
        // Two mechanisms reach the threshold.
        assert_eq!(level("immunosuppression via lag-3 expression"), 6);
        // Four half-point keywords reach the threshold.
        assert_eq!(
            level("tolerogenic anti-inflammatory suppressor cell regulatory function"),
            6
        );
    }

    #[test]
    fn functional_beats_foxp3() {
        assert_eq!(level("foxp3+ cells with il-10 secretion and immunosuppression"), 6);
    }

    #[test]
    fn surface_markers_are_blocked_by_advanced_stage() {
        assert_eq!(level("cd4+cd25+cd127low cells"), 3);
        // A bare Foxp3 mention blocks the marker rule; the Treg context
        // default then picks nTreg.
        assert_eq!(level("cd4+cd25+cd127low foxp3 regulatory t cells"), 4);
    }

    #[test]
    fn precursors_need_absent_treg_context() {
        assert_eq!(level("naive cd4 helper t cells"), 2);
        assert_eq!(level("helper t cell tolerance"), 0);
    }

    #[test]
    fn clp_is_blocked_by_t_cell_mentions() {
        assert_eq!(level("common lymphoid progenitor to thymocyte"), 0);
    }

    #[test]
    fn context_only_text_falls_through_to_zero() {
        let c = StageClassifier::default().classify("suppressive macrophages");
        assert_eq!(c.rule, MatchedRule::Fallback);
        assert_eq!(c.level, StageLevel::Hsc);
    }

    #[test]
    fn case_insensitive_matching() {
        assert_eq!(level("THYMIC TREG development"), 4);
    }
}
