//! Phrase sets and stage profiles driving the classifier.
//!
//! `VocabularyConfig::default()` is the built-in Treg differentiation
//! vocabulary. A custom vocabulary can be loaded from JSON; phrases are
//! lowercased when a classifier is constructed, so matching is
//! case-insensitive regardless of how the config spells them.

use serde::{Deserialize, Serialize};
use tracing::debug;

use raptor_core::constants::STAGE_COUNT;
use raptor_core::errors::{RaptorError, RaptorResult};
use raptor_core::models::StageLevel;

/// Display and keyword metadata for one stage level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageProfile {
    pub level: StageLevel,
    pub name: String,
    pub description: String,
    /// Hex color used by renderers.
    pub color: String,
    pub markers: Vec<String>,
    pub keywords: Vec<String>,
}

/// Every phrase set consulted by `StageClassifier::determine_level`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VocabularyConfig {
    // Level 6 scoring.
    pub functional_cytokines: Vec<String>,
    pub functional_mechanisms: Vec<String>,
    /// Weaker functional phrases, worth half a point each.
    pub functional_keywords: Vec<String>,

    // Level 5.
    pub foxp3_specific: Vec<String>,
    pub stability_markers: Vec<String>,
    pub transient_markers: Vec<String>,

    // Levels 4 and 7, explicit phrases.
    pub ntreg_specific: Vec<String>,
    pub itreg_specific: Vec<String>,

    // Level 3.
    pub surface_marker_combinations: Vec<String>,
    /// Any of these blocks a level-3 match.
    pub advanced_stage_markers: Vec<String>,

    /// Presence of any of these routes the text to the generalized Treg
    /// fallback instead of the precursor checks.
    pub treg_context: Vec<String>,

    // Precursors (levels 0-2).
    pub hsc_specific: Vec<String>,
    pub hsc_general: Vec<String>,
    pub hsc_context: Vec<String>,
    pub lymphoid_mentions: Vec<String>,
    pub clp_specific: Vec<String>,
    pub t_cell_mentions: Vec<String>,
    pub cd4_specific: Vec<String>,

    // Generalized Treg fallback.
    pub itreg_cues: Vec<String>,
    pub ntreg_cues: Vec<String>,
    pub default_ntreg_cues: Vec<String>,

    /// One profile per stage level, indexed by level.
    pub profiles: Vec<StageProfile>,
}

impl VocabularyConfig {
    /// Parse a vocabulary from JSON. Missing sets take the built-in values.
    pub fn from_json(json: &str) -> RaptorResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        debug!(profiles = config.profiles.len(), "custom vocabulary loaded");
        Ok(config)
    }

    pub fn validate(&self) -> RaptorResult<()> {
        if self.profiles.len() != STAGE_COUNT {
            return Err(RaptorError::ConfigError {
                reason: format!(
                    "vocabulary needs {STAGE_COUNT} stage profiles, found {}",
                    self.profiles.len()
                ),
            });
        }
        for (i, profile) in self.profiles.iter().enumerate() {
            if profile.level.index() as usize != i {
                return Err(RaptorError::ConfigError {
                    reason: format!("stage profile {i} declares level {}", profile.level.index()),
                });
            }
        }
        Ok(())
    }

    /// Profile for `level`, falling back to the built-in one if the config
    /// was constructed without validation.
    pub fn profile(&self, level: StageLevel) -> StageProfile {
        self.profiles
            .get(level.index() as usize)
            .cloned()
            .unwrap_or_else(|| default_profile(level))
    }

    /// Copy with every phrase lowercased.
    pub fn normalized(mut self) -> Self {
        for set in self.phrase_sets_mut() {
            for phrase in set.iter_mut() {
                *phrase = phrase.to_lowercase();
            }
        }
        self
    }

    fn phrase_sets_mut(&mut self) -> [&mut Vec<String>; 21] {
        [
            &mut self.functional_cytokines,
            &mut self.functional_mechanisms,
            &mut self.functional_keywords,
            &mut self.foxp3_specific,
            &mut self.stability_markers,
            &mut self.transient_markers,
            &mut self.ntreg_specific,
            &mut self.itreg_specific,
            &mut self.surface_marker_combinations,
            &mut self.advanced_stage_markers,
            &mut self.treg_context,
            &mut self.hsc_specific,
            &mut self.hsc_general,
            &mut self.hsc_context,
            &mut self.lymphoid_mentions,
            &mut self.clp_specific,
            &mut self.t_cell_mentions,
            &mut self.cd4_specific,
            &mut self.itreg_cues,
            &mut self.ntreg_cues,
            &mut self.default_ntreg_cues,
        ]
    }
}

fn phrases(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for VocabularyConfig {
    fn default() -> Self {
        Self {
            functional_cytokines: phrases(&[
                "il-10",
                "il-35",
                "tgf-beta secret",
                "tgf-β secret",
                "il-10 produc",
                "il-10+",
                "il-10 secret",
            ]),
            functional_mechanisms: phrases(&[
                "suppressive function",
                "immunosuppression",
                "immune suppression",
                "contact-dependent suppress",
                "effector suppress",
                "ctla-4 mediat",
                "lag-3 express",
                "immune tolerance mechanism",
            ]),
            functional_keywords: phrases(&[
                "suppressor cell",
                "suppressive capacity",
                "suppressive activity",
                "regulatory function",
                "tolerogenic",
                "anti-inflammatory",
            ]),
            foxp3_specific: phrases(&[
                "foxp3 express",
                "foxp3+",
                "foxp3 positive",
                "scurfin",
                "foxp3 transcript",
                "ipex",
                "foxp3 gene",
                "foxp3 protein",
            ]),
            stability_markers: phrases(&["tsdr demethyl", "cd45ra", "cns2 demethyl", "epigenetic"]),
            transient_markers: phrases(&["transient foxp3", "temporary", "activation-induced foxp3"]),
            ntreg_specific: phrases(&[
                "thymic treg",
                "natural treg",
                "ntreg",
                "ttreg",
                "helios+ treg",
                "nrp1+ treg",
                "aire medulla",
            ]),
            itreg_specific: phrases(&[
                "induced treg",
                "itreg",
                "ptreg",
                "peripheral treg conversion",
                "tgf-beta induc",
                "tgf-β induc",
                "retinoic acid treg",
                "gut-associated treg",
                "oral tolerance treg",
            ]),
            surface_marker_combinations: phrases(&[
                "cd4+cd25+cd127low",
                "cd4+ cd25+ cd127low",
                "cd25high cd127low",
                "cd25+ cd127-",
                "cd127low treg",
                "cd127- treg",
                "il-7rαlow treg",
                "il-7r alpha low regulatory",
            ]),
            advanced_stage_markers: phrases(&[
                "foxp3",
                "thymic treg",
                "induced treg",
                "ntreg",
                "itreg",
            ]),
            treg_context: phrases(&[
                "regulatory t",
                "treg",
                "foxp3",
                "cd25+",
                "suppressive",
                "tolerance",
            ]),
            hsc_specific: phrases(&[
                "lin-sca-1+c-kit+",
                "lin- sca-1+ c-kit+",
                "lsk cell",
                "cd34-cd150+",
                "cd34- cd150+",
                "slam marker hsc",
                "long-term hsc",
                "lt-hsc",
                "quiescent hsc",
            ]),
            hsc_general: phrases(&["hematopoietic stem", "hsc", "bone marrow niche"]),
            hsc_context: phrases(&[
                "self-renewal",
                "multipotent",
                "quiescence",
                "stem cell niche",
            ]),
            lymphoid_mentions: phrases(&["lymphoid", "t cell", "b cell"]),
            clp_specific: phrases(&[
                "common lymphoid progenitor",
                "clp",
                "lymphoid progenitor",
                "il-7r+ progenitor",
                "flt3+ il-7r+",
                "lymphoid lineage commitment",
            ]),
            t_cell_mentions: phrases(&["cd4+", "cd8+", "tcr", "thymocyte"]),
            cd4_specific: phrases(&[
                "cd4+ t cell",
                "cd4 positive t cell",
                "helper t cell",
                "th1 cell",
                "th2 cell",
                "th17 cell",
                "naive cd4",
                "effector cd4",
            ]),
            itreg_cues: phrases(&[
                "peripheral",
                "induced",
                "conversion",
                "gut",
                "intestin",
                "mucosal",
                "tgf",
                "oral tolerance",
            ]),
            ntreg_cues: phrases(&["thymus", "thymic", "natural regulatory", "central tolerance"]),
            default_ntreg_cues: phrases(&["regulatory t", "cd25+"]),
            profiles: StageLevel::ALL.iter().map(|l| default_profile(*l)).collect(),
        }
    }
}

fn default_profile(level: StageLevel) -> StageProfile {
    let (name, description, color, markers, keywords): (&str, &str, &str, &[&str], &[&str]) =
        match level {
            StageLevel::Hsc => (
                "HSC",
                "Hematopoietic Stem Cell",
                "#E74C3C",
                &["Lin-", "Sca-1+", "c-Kit+", "CD34-", "CD150+"],
                &["stem cell", "multipotent", "self-renewal", "bone marrow"],
            ),
            StageLevel::Clp => (
                "CLP",
                "Common Lymphoid Progenitor",
                "#3498DB",
                &["IL-7R+", "Flt3+", "Lin-", "Sca-1+"],
                &["lymphoid", "IL-7", "progenitor", "commitment"],
            ),
            StageLevel::Cd4T => (
                "CD4+T",
                "CD4+ T Helper Cell",
                "#9B59B6",
                &["CD4+", "TCR+", "CD3+", "CD8-"],
                &["helper T", "MHC-II", "TCR", "thymic selection"],
            ),
            StageLevel::Cd25Cd127Low => (
                "CD4+CD25+CD127low",
                "CD4+CD25high CD127low T Cell",
                "#1ABC9C",
                &["CD4+", "CD25high", "CD127low", "IL-7Rαlow", "GITR+"],
                &[
                    "CD25 high expression",
                    "CD127 low",
                    "IL-7R alpha low",
                    "IL-2R",
                    "activated T cell",
                    "Treg precursor",
                    "human Treg identification",
                ],
            ),
            StageLevel::NTreg => (
                "nTreg",
                "Thymus-derived Natural Treg",
                "#F39C12",
                &["thymic", "Helios+", "Nrp1+", "natural"],
                &[
                    "thymic selection",
                    "central tolerance",
                    "AIRE",
                    "antigen recognition",
                ],
            ),
            StageLevel::Foxp3Treg => (
                "Foxp3+Treg",
                "Foxp3-expressing Regulatory T Cell",
                "#16A085",
                &["Foxp3+", "CD4+", "CD25high", "CD127low", "CTLA-4+"],
                &[
                    "Foxp3",
                    "transcription factor",
                    "epigenetic stability",
                    "Treg identity",
                    "TSDR",
                    "demethylation",
                    "CD45RA",
                ],
            ),
            StageLevel::FunctionalTreg => (
                "Functional Treg",
                "Cytokine-producing Suppressive Treg",
                "#27AE60",
                &["Foxp3+", "IL-10+", "TGF-beta+", "CTLA-4+"],
                &[
                    "immunosuppression",
                    "tolerance",
                    "cytokine production",
                    "suppressive function",
                ],
            ),
            StageLevel::ITreg => (
                "iTreg (Induced)",
                "Peripherally Induced Regulatory T Cell",
                "#27AE60",
                &["induced", "peripheral", "TGF-β+", "RA+", "gut-associated"],
                &[
                    "peripheral conversion",
                    "TGF-beta induced",
                    "retinoic acid",
                    "oral tolerance",
                    "gut immunity",
                    "iTreg",
                ],
            ),
        };
    StageProfile {
        level,
        name: name.to_string(),
        description: description.to_string(),
        color: color.to_string(),
        markers: phrases(markers),
        keywords: phrases(keywords),
    }
}
