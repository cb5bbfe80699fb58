use serde::{Deserialize, Serialize};

use super::defaults;

/// Corpus intake configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakeConfig {
    /// Maximum number of level-0 documents kept after classification.
    pub level_0_limit: usize,
    /// Seed for the level-0 down-sampling.
    pub seed: u64,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            level_0_limit: defaults::DEFAULT_LEVEL_0_LIMIT,
            seed: defaults::DEFAULT_SEED,
        }
    }
}
