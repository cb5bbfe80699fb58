//! Stage-specific display labels for documents and clusters.

use raptor_core::models::StageLevel;

use crate::vocabulary::VocabularyConfig;

/// Reasons a label is unfit for renderers that only handle ASCII.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LabelIssue {
    #[error("label too short")]
    TooShort,
    #[error("label contains non-ASCII characters")]
    NonAscii,
}

/// Multi-line label describing `text` at `level`.
///
/// Levels with distinguishing cues (cytokines, Foxp3 stability, origin,
/// surface markers) get a cue line; otherwise the label falls back to
/// `"<name>\nCluster <id>\n(n=<size>)"`.
pub fn generate_label(
    vocab: &VocabularyConfig,
    text: &str,
    level: StageLevel,
    cluster_id: usize,
    cluster_size: usize,
) -> String {
    let name = vocab.profile(level).name;
    let t = text.to_lowercase();
    let has = |needle: &str| t.contains(needle);
    let n = format!("(n={cluster_size})");

    match level {
        StageLevel::FunctionalTreg => {
            let mut cytokines = Vec::new();
            if has("il-10") {
                cytokines.push("IL-10");
            }
            if has("tgf-beta") || has("tgf-β") {
                cytokines.push("TGF-β");
            }
            if has("ctla-4") {
                cytokines.push("CTLA-4");
            }
            if !cytokines.is_empty() {
                return format!("{name}\n{}\n{n}", cytokines.join("+"));
            }
        }
        StageLevel::Foxp3Treg if has("foxp3") => {
            let cue = if has("tsdr demethyl") || has("cd45ra") {
                "Foxp3+ stable\nTSDR demethyl"
            } else if has("transient") || has("cd45ro") {
                "Foxp3+ transient\nCD45RO+"
            } else {
                "Foxp3+"
            };
            return format!("{name}\n{cue}\n{n}");
        }
        StageLevel::NTreg => {
            if has("thymic") || has("helios+") {
                return format!("{name}\nnTreg-thymic\n{n}");
            }
            if has("peripheral") || has("induced") {
                return format!("{name}\niTreg-peripheral\n{n}");
            }
        }
        StageLevel::ITreg => {
            if has("peripheral") || has("induced") || has("itreg") {
                let cue = if has("tgf-beta") || has("tgf-β") {
                    "peripheral-TGF-β"
                } else if has("gut") || has("oral tolerance") {
                    "gut-associated"
                } else {
                    "peripheral"
                };
                return format!("{name}\n{cue}\n{n}");
            }
            return format!("{name}\n{n}");
        }
        StageLevel::Cd25Cd127Low => {
            if has("cd127") || has("il-7r") {
                return format!("{name}\nCD25high CD127low\nIL-2Rα+/IL-7Rα−\n{n}");
            }
            return format!("{name}\nCD25high\nIL-2Rα high\n{n}");
        }
        _ => {}
    }

    format!("{name}\nCluster {cluster_id}\n{n}")
}

/// Accept labels of at least two characters made only of ASCII.
pub fn validate_label(label: &str) -> Result<(), LabelIssue> {
    if label.chars().count() < 2 {
        return Err(LabelIssue::TooShort);
    }
    if !label.is_ascii() {
        return Err(LabelIssue::NonAscii);
    }
    Ok(())
}
