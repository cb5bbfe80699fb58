use serde::{Deserialize, Serialize};

use raptor_core::errors::RaptorResult;
use raptor_core::models::Document;

/// A PubMed record with a non-empty abstract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub pmid: String,
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
}

/// An article together with the collection job that found it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectedArticle {
    #[serde(flatten)]
    pub article: Article,
    pub expected_level: u8,
    pub query: String,
}

/// Corpus documents `doc_<i>` with text `"<title>. <abstract>"` and the
/// PMID as external id.
pub fn articles_to_documents(articles: &[CollectedArticle]) -> RaptorResult<Vec<Document>> {
    articles
        .iter()
        .enumerate()
        .map(|(idx, collected)| {
            let a = &collected.article;
            Ok(Document::new(format!("doc_{idx}"), format!("{}. {}", a.title, a.abstract_text))?
                .with_external_id(&a.pmid)
                .with_title(&a.title))
        })
        .collect()
}
