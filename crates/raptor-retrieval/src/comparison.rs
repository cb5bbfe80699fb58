//! Side-by-side timing and score comparison of the three search modes.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::info;

use raptor_core::errors::RaptorResult;

use crate::engine::RetrievalEngine;
use crate::hit::{SearchHit, SearchMode};

/// Questions spanning the differentiation hierarchy, from stem cells to
/// clinical use of regulatory T cells.
pub const DEFAULT_QUERIES: [&str; 10] = [
    "What is the differentiation pathway from hematopoietic stem cells to regulatory T cells?",
    "What is the role of IL-7 receptor in common lymphoid progenitor cells?",
    "Explain the mechanism of thymic selection in CD4 positive T cells",
    "How do CD25 high expression and CD127 low expression function as Treg markers?",
    "What is the difference between thymic-derived Treg and peripherally-induced Treg?",
    "How does Foxp3 transcription factor control Treg cell differentiation?",
    "How does TSDR demethylation contribute to Treg cell stability?",
    "Explain the immunosuppressive mechanisms of regulatory T cells in detail",
    "What role does IL-10 and TGF-beta production by Treg play?",
    "What are the challenges and prospects for clinical applications of regulatory T cells?",
];

const CSV_HEADER: [&str; 11] = [
    "Query_ID",
    "Query",
    "Keyword_Time",
    "Semantic_Time",
    "Hybrid_Time",
    "Keyword_Score",
    "Semantic_Score",
    "Hybrid_Score",
    "Keyword_Top",
    "Semantic_Top",
    "Hybrid_Top",
];

/// One mode's outcome for one query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModeResult {
    /// Wall-clock seconds.
    pub time: f64,
    pub top_results: Vec<SearchHit>,
    /// Score of the first hit, 0 when there are none.
    pub top_score: f64,
}

impl ModeResult {
    fn new(time: f64, top_results: Vec<SearchHit>) -> Self {
        let top_score = top_results.first().map_or(0.0, |h| h.score.value());
        Self {
            time,
            top_results,
            top_score,
        }
    }

    /// Node id of the first hit, `N/A` when there are none.
    pub fn top_node(&self) -> &str {
        self.top_results.first().map_or("N/A", |h| h.node_id.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryComparison {
    /// 1-based position in the query list.
    pub query_id: usize,
    pub query: String,
    pub keyword: ModeResult,
    pub semantic: ModeResult,
    pub hybrid: ModeResult,
}

impl QueryComparison {
    pub fn mode(&self, mode: SearchMode) -> &ModeResult {
        match mode {
            SearchMode::Keyword => &self.keyword,
            SearchMode::Semantic => &self.semantic,
            SearchMode::Hybrid => &self.hybrid,
        }
    }
}

/// Mean and population standard deviation of a mode's search time.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TimingStats {
    pub mean: f64,
    pub std: f64,
}

impl TimingStats {
    fn from_samples(samples: &[f64]) -> Self {
        if samples.is_empty() {
            return Self::default();
        }
        let n = samples.len() as f64;
        let mean = samples.iter().sum::<f64>() / n;
        let variance = samples.iter().map(|t| (t - mean).powi(2)).sum::<f64>() / n;
        Self {
            mean,
            std: variance.sqrt(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ComparisonSummary {
    pub queries: usize,
    pub keyword: TimingStats,
    pub semantic: TimingStats,
    pub hybrid: TimingStats,
}

impl ComparisonSummary {
    pub fn from_results(results: &[QueryComparison]) -> Self {
        let stats = |mode| {
            let times: Vec<f64> = results.iter().map(|r| r.mode(mode).time).collect();
            TimingStats::from_samples(&times)
        };
        Self {
            queries: results.len(),
            keyword: stats(SearchMode::Keyword),
            semantic: stats(SearchMode::Semantic),
            hybrid: stats(SearchMode::Hybrid),
        }
    }
}

pub struct ComparisonRunner<'a> {
    engine: &'a RetrievalEngine<'a>,
}

impl<'a> ComparisonRunner<'a> {
    pub fn new(engine: &'a RetrievalEngine<'a>) -> Self {
        Self { engine }
    }

    /// Run every query through all three modes, in order.
    pub fn run<S: AsRef<str>>(
        &self,
        queries: &[S],
        top_k: usize,
    ) -> RaptorResult<Vec<QueryComparison>> {
        let mut results = Vec::with_capacity(queries.len());
        for (idx, query) in queries.iter().enumerate() {
            let query = query.as_ref();
            let keyword = self.timed(SearchMode::Keyword, query, top_k)?;
            let semantic = self.timed(SearchMode::Semantic, query, top_k)?;
            let hybrid = self.timed(SearchMode::Hybrid, query, top_k)?;
            info!(
                query_id = idx + 1,
                keyword_top = keyword.top_score,
                semantic_top = semantic.top_score,
                hybrid_top = hybrid.top_score,
                "query compared"
            );
            results.push(QueryComparison {
                query_id: idx + 1,
                query: query.to_string(),
                keyword,
                semantic,
                hybrid,
            });
        }
        Ok(results)
    }

    fn timed(&self, mode: SearchMode, query: &str, top_k: usize) -> RaptorResult<ModeResult> {
        let start = Instant::now();
        let hits = self.engine.search(mode, query, top_k)?;
        Ok(ModeResult::new(start.elapsed().as_secs_f64(), hits))
    }
}

/// Write `results` as a pretty-printed JSON array.
pub fn write_json(path: &Path, results: &[QueryComparison]) -> RaptorResult<()> {
    ensure_parent(path)?;
    fs::write(path, serde_json::to_string_pretty(results)?)?;
    info!(path = %path.display(), queries = results.len(), "comparison json written");
    Ok(())
}

/// Write one summary row per query.
pub fn write_csv(path: &Path, results: &[QueryComparison]) -> RaptorResult<()> {
    ensure_parent(path)?;
    fs::write(path, to_csv(results))?;
    info!(path = %path.display(), queries = results.len(), "comparison csv written");
    Ok(())
}

pub fn to_csv(results: &[QueryComparison]) -> String {
    let mut out = String::new();
    push_row(&mut out, CSV_HEADER.iter().map(|h| h.to_string()));
    for r in results {
        let modes = SearchMode::ALL.map(|m| r.mode(m));
        let mut row = vec![r.query_id.to_string(), r.query.clone()];
        row.extend(modes.iter().map(|m| m.time.to_string()));
        row.extend(modes.iter().map(|m| m.top_score.to_string()));
        row.extend(modes.iter().map(|m| m.top_node().to_string()));
        push_row(&mut out, row.into_iter());
    }
    out
}

fn push_row(out: &mut String, fields: impl Iterator<Item = String>) {
    let line: Vec<String> = fields.map(|f| csv_field(&f)).collect();
    let _ = writeln!(out, "{}", line.join(","));
}

/// Quote a field when it contains a separator, quote or line break.
fn csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn ensure_parent(path: &Path) -> RaptorResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_are_quoted_only_when_needed() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a, b"), "\"a, b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn timing_stats_use_population_std() {
        let stats = TimingStats::from_samples(&[1.0, 3.0]);
        assert_eq!(stats.mean, 2.0);
        assert_eq!(stats.std, 1.0);
        assert_eq!(TimingStats::from_samples(&[]), TimingStats::default());
    }

    #[test]
    fn empty_mode_reports_na_and_zero() {
        let result = ModeResult::new(0.1, Vec::new());
        assert_eq!(result.top_node(), "N/A");
        assert_eq!(result.top_score, 0.0);
    }
}
