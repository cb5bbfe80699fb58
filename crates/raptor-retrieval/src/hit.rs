//! Search result records.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use raptor_core::errors::RetrievalError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    Keyword,
    Semantic,
    Hybrid,
}

impl SearchMode {
    pub const ALL: [SearchMode; 3] = [Self::Keyword, Self::Semantic, Self::Hybrid];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Keyword => "keyword",
            Self::Semantic => "semantic",
            Self::Hybrid => "hybrid",
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchMode {
    type Err = RetrievalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "keyword" => Ok(Self::Keyword),
            "semantic" => Ok(Self::Semantic),
            "hybrid" => Ok(Self::Hybrid),
            other => Err(RetrievalError::UnknownMode {
                mode: other.to_string(),
            }),
        }
    }
}

/// Score of a hit, tagged by the mode that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum HitScore {
    /// Number of distinct query tokens found in the node text.
    Keyword { score: u32 },
    /// Cosine similarity between query and node embeddings.
    Semantic { similarity: f64 },
    /// Weighted blend, with both inputs kept for auditing.
    Hybrid {
        hybrid: f64,
        keyword_norm: f64,
        semantic: f64,
    },
}

impl HitScore {
    /// The score results are ranked by.
    pub fn value(&self) -> f64 {
        match *self {
            Self::Keyword { score } => score as f64,
            Self::Semantic { similarity } => similarity,
            Self::Hybrid { hybrid, .. } => hybrid,
        }
    }

    pub fn mode(&self) -> SearchMode {
        match self {
            Self::Keyword { .. } => SearchMode::Keyword,
            Self::Semantic { .. } => SearchMode::Semantic,
            Self::Hybrid { .. } => SearchMode::Hybrid,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub node_id: String,
    /// Tree level of the node.
    pub level: u32,
    pub is_leaf: bool,
    /// Leading characters of the node text.
    pub text: String,
    pub score: HitScore,
}
