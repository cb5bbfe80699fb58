//! Parsing of E-utilities XML responses.
//!
//! `esearch` returns `<IdList><Id>..</Id></IdList>`. `efetch` returns a
//! `<PubmedArticleSet>` whose articles carry a `PMID`, an `ArticleTitle`
//! and zero or more `AbstractText` sections, any of which may contain
//! inline markup such as `<i>` or `<sup>`.

use quick_xml::events::Event;
use quick_xml::Reader;

use raptor_core::errors::IngestError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Pmid,
    Title,
    Abstract,
}

impl Field {
    fn from_tag(tag: &[u8]) -> Option<Self> {
        match tag {
            b"PMID" => Some(Self::Pmid),
            b"ArticleTitle" => Some(Self::Title),
            b"AbstractText" => Some(Self::Abstract),
            _ => None,
        }
    }
}

#[derive(Default)]
struct ArticleBuilder {
    pmid: Option<String>,
    title: String,
    abstracts: Vec<String>,
}

impl ArticleBuilder {
    fn finish(self) -> Option<crate::Article> {
        let abstract_text = self
            .abstracts
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        let pmid = self.pmid?;
        if abstract_text.is_empty() {
            return None;
        }
        Some(crate::Article {
            pmid,
            title: self.title.trim().to_string(),
            abstract_text,
        })
    }
}

fn parse_error(reader: &Reader<&[u8]>, err: impl std::fmt::Display) -> IngestError {
    IngestError::Parse {
        reason: format!("at byte {}: {err}", reader.error_position()),
    }
}

/// PMIDs listed in an esearch response, in response order.
pub fn parse_search_ids(xml: &str) -> Result<Vec<String>, IngestError> {
    let mut reader = Reader::from_str(xml);
    let mut ids = Vec::new();
    let mut in_id = false;
    let mut current = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == b"Id" => {
                in_id = true;
                current.clear();
            }
            Ok(Event::Text(t)) if in_id => {
                current.push_str(&t.unescape().map_err(|e| parse_error(&reader, e))?);
            }
            Ok(Event::End(e)) if e.name().as_ref() == b"Id" => {
                in_id = false;
                let id = current.trim();
                if !id.is_empty() {
                    ids.push(id.to_string());
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(parse_error(&reader, e)),
            _ => {}
        }
    }
    Ok(ids)
}

/// Articles in an efetch response. Records without a PMID or without
/// abstract text are skipped; multiple abstract sections are joined with a
/// space. Only the first PMID of each record counts, since citation
/// lists repeat the element.
pub fn parse_articles(xml: &str) -> Result<Vec<crate::Article>, IngestError> {
    let mut reader = Reader::from_str(xml);
    let mut articles = Vec::new();
    let mut current: Option<ArticleBuilder> = None;
    let mut field: Option<Field> = None;
    let mut buffer = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = e.name();
                if name.as_ref() == b"PubmedArticle" {
                    current = Some(ArticleBuilder::default());
                } else if field.is_none() && current.is_some() {
                    field = Field::from_tag(name.as_ref());
                    buffer.clear();
                }
            }
            Ok(Event::Text(t)) if field.is_some() => {
                buffer.push_str(&t.unescape().map_err(|e| parse_error(&reader, e))?);
            }
            Ok(Event::CData(c)) if field.is_some() => {
                buffer.push_str(&String::from_utf8_lossy(&c));
            }
            Ok(Event::End(e)) => {
                let name = e.name();
                if name.as_ref() == b"PubmedArticle" {
                    if let Some(article) = current.take().and_then(ArticleBuilder::finish) {
                        articles.push(article);
                    }
                    field = None;
                } else if field.is_some() && Field::from_tag(name.as_ref()) == field {
                    if let Some(builder) = current.as_mut() {
                        let text = std::mem::take(&mut buffer);
                        match field {
                            Some(Field::Pmid) if builder.pmid.is_none() => {
                                builder.pmid = Some(text.trim().to_string());
                            }
                            Some(Field::Title) if builder.title.is_empty() => builder.title = text,
                            Some(Field::Abstract) => builder.abstracts.push(text),
                            _ => {}
                        }
                    }
                    field = None;
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(parse_error(&reader, e)),
            _ => {}
        }
    }
    Ok(articles)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EFETCH: &str = r#"<?xml version="1.0"?>
<PubmedArticleSet>
  <PubmedArticle>
    <MedlineCitation>
      <PMID Version="1">111</PMID>
      <Article>
        <ArticleTitle>Foxp3 &amp; Treg identity</ArticleTitle>
        <Abstract>
          <AbstractText Label="BACKGROUND">The <i>Foxp3</i> gene.</AbstractText>
          <AbstractText Label="RESULTS">TSDR is demethylated.</AbstractText>
        </Abstract>
      </Article>
      <CommentsCorrectionsList>
        <CommentsCorrections><PMID Version="1">999</PMID></CommentsCorrections>
      </CommentsCorrectionsList>
    </MedlineCitation>
  </PubmedArticle>
  <PubmedArticle>
    <MedlineCitation>
      <PMID Version="1">222</PMID>
      <Article><ArticleTitle>No abstract here</ArticleTitle></Article>
    </MedlineCitation>
  </PubmedArticle>
</PubmedArticleSet>"#;

    #[test]
    fn parses_articles_and_skips_missing_abstracts() {
        let articles = parse_articles(EFETCH).unwrap();
        assert_eq!(articles.len(), 1);
        let a = &articles[0];
        assert_eq!(a.pmid, "111");
        assert_eq!(a.title, "Foxp3 & Treg identity");
        assert_eq!(a.abstract_text, "The Foxp3 gene. TSDR is demethylated.");
    }

    #[test]
    fn parses_search_ids() {
        let xml = "<eSearchResult><Count>2</Count><IdList><Id>1</Id><Id> 2 </Id></IdList></eSearchResult>";
        assert_eq!(parse_search_ids(xml).unwrap(), vec!["1", "2"]);
    }

    #[test]
    fn malformed_xml_is_a_parse_error() {
        let err = parse_articles("<PubmedArticle><PMID>1</ArticleTitle>").unwrap_err();
        assert!(matches!(err, IngestError::Parse { .. }));
    }
}
