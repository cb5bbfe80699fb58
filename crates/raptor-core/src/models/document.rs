use serde::{Deserialize, Serialize};

use super::stage::StageLevel;
use crate::errors::{RaptorError, RaptorResult};
use crate::text::is_blank;

/// A single corpus document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Unique within a corpus.
    pub id: String,
    pub text: String,
    /// Upstream identifier such as a PubMed id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Document {
    /// Create a document, rejecting blank ids and blank text.
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> RaptorResult<Self> {
        let doc = Self {
            id: id.into(),
            text: text.into(),
            external_id: None,
            title: None,
        };
        doc.validate()?;
        Ok(doc)
    }

    pub fn with_external_id(mut self, external_id: impl Into<String>) -> Self {
        self.external_id = Some(external_id.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn validate(&self) -> RaptorResult<()> {
        if is_blank(&self.id) {
            return Err(RaptorError::invalid_input("document id must not be blank"));
        }
        if is_blank(&self.text) {
            return Err(RaptorError::invalid_input(format!(
                "document {} has empty text",
                self.id
            )));
        }
        Ok(())
    }
}

/// A document after stage classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedDocument {
    pub document: Document,
    pub level: StageLevel,
    pub label: String,
}

/// Per-document metadata written next to a persisted tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub id: String,
    pub external_id: Option<String>,
    pub title: Option<String>,
    pub determined_level: StageLevel,
    pub label: String,
    pub text_length: usize,
}

impl From<&ClassifiedDocument> for DocumentMetadata {
    fn from(doc: &ClassifiedDocument) -> Self {
        Self {
            id: doc.document.id.clone(),
            external_id: doc.document.external_id.clone(),
            title: doc.document.title.clone(),
            determined_level: doc.level,
            label: doc.label.clone(),
            text_length: doc.document.text.chars().count(),
        }
    }
}
