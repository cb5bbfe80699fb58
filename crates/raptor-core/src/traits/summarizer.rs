use crate::errors::RaptorResult;

/// Produces the summary text of an interior tree node.
pub trait ISummarizer: Send + Sync {
    /// Summarize `texts` into at most `max_chars` characters.
    ///
    /// Must be deterministic and must return non-empty output for
    /// non-empty input.
    fn summarize(&self, texts: &[String], max_chars: usize) -> RaptorResult<String>;

    fn name(&self) -> &str;
}
