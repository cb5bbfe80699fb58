use std::fmt;

use serde::{Deserialize, Serialize};

/// Treg differentiation stage, ordered from stem cell to induced Treg.
///
/// Serialized as its integer level (0..=7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum StageLevel {
    /// Hematopoietic stem cell.
    Hsc = 0,
    /// Common lymphoid progenitor.
    Clp = 1,
    /// CD4+ T cell.
    Cd4T = 2,
    /// CD4+CD25+CD127low regulatory phenotype.
    Cd25Cd127Low = 3,
    /// Natural (thymic) Treg.
    NTreg = 4,
    /// Foxp3+ Treg.
    Foxp3Treg = 5,
    /// Functional (suppressive) Treg.
    FunctionalTreg = 6,
    /// Induced (peripheral) Treg.
    ITreg = 7,
}

impl StageLevel {
    pub const ALL: [StageLevel; 8] = [
        Self::Hsc,
        Self::Clp,
        Self::Cd4T,
        Self::Cd25Cd127Low,
        Self::NTreg,
        Self::Foxp3Treg,
        Self::FunctionalTreg,
        Self::ITreg,
    ];

    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn from_index(level: u8) -> Option<Self> {
        Self::ALL.get(level as usize).copied()
    }

    /// Short marker-style name used in logs and reports.
    pub fn short_name(self) -> &'static str {
        match self {
            Self::Hsc => "HSC",
            Self::Clp => "CLP",
            Self::Cd4T => "CD4+T",
            Self::Cd25Cd127Low => "CD4+CD25+CD127low",
            Self::NTreg => "nTreg",
            Self::Foxp3Treg => "Foxp3+Treg",
            Self::FunctionalTreg => "Functional Treg",
            Self::ITreg => "iTreg",
        }
    }
}

impl fmt::Display for StageLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{} {}", self.index(), self.short_name())
    }
}

impl From<StageLevel> for u8 {
    fn from(level: StageLevel) -> Self {
        level.index()
    }
}

impl TryFrom<u8> for StageLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_index(value).ok_or_else(|| format!("stage level {value} is out of range 0..=7"))
    }
}
