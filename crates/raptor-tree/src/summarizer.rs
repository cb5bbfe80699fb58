//! Extractive summarizer: TF-IDF key phrases plus TextRank sentences.

use raptor_core::errors::{RaptorError, RaptorResult};
use raptor_core::text::{is_blank, truncate_chars};
use raptor_core::traits::ISummarizer;

use crate::algorithms::{textrank, tfidf};

/// Key phrases listed at the head of each summary.
const KEY_PHRASE_COUNT: usize = 5;

/// Deterministic extractive summaries of the form
/// `"[phrase, phrase, ...] Sentence. Sentence."`.
#[derive(Debug, Clone)]
pub struct TextRankSummarizer {
    sentences: usize,
}

impl TextRankSummarizer {
    pub fn new(sentences: usize) -> Self {
        Self {
            sentences: sentences.max(1),
        }
    }
}

impl Default for TextRankSummarizer {
    fn default() -> Self {
        Self::new(raptor_core::config::defaults::DEFAULT_SUMMARY_SENTENCES)
    }
}

impl ISummarizer for TextRankSummarizer {
    fn summarize(&self, texts: &[String], max_chars: usize) -> RaptorResult<String> {
        let texts: Vec<String> = texts.iter().filter(|t| !is_blank(t)).cloned().collect();
        let Some(first) = texts.first() else {
            return Err(RaptorError::invalid_input("nothing to summarize"));
        };
        if max_chars == 0 {
            return Err(RaptorError::invalid_input("summary bound must be positive"));
        }

        let phrases: Vec<String> = tfidf::extract_key_phrases(&texts, KEY_PHRASE_COUNT)
            .into_iter()
            .map(|(term, _)| term)
            .collect();

        let body = texts.join(" ");
        let mut extract = textrank::summarize(&body, self.sentences);
        if is_blank(&extract) {
            extract = first.trim().to_string();
        }

        let summary = if phrases.is_empty() {
            extract
        } else {
            format!("[{}] {}", phrases.join(", "), extract)
        };
        Ok(truncate_chars(&summary, max_chars).trim_end().to_string())
    }

    fn name(&self) -> &str {
        "textrank"
    }
}
