//! One-shot analysis of a baseline and a candidate log.
//!
//! [`Analysis::run`] extracts both engines' records, summarizes them per
//! category and across all rounds, and compares the summaries. The result owns everything the
//! exporters in [`crate::convert`] need.

use log::info;

use crate::config::AnalyzerConfig;
use crate::extract::{extract_all, extract_preparation, DataPreparation};
use crate::record::RoundRecord;
use crate::stats::{
    compare, summarize, summarize_overall, Comparison, EngineSummary, OverallComparison,
    OverallSummary,
};

/// Input for one engine: its log text and opaque run metadata.
#[derive(Debug, Clone, Default)]
pub struct EngineRun<'a> {
    /// Full benchmark log.
    pub text: &'a str,
    /// Free-form description of the data preparation time, carried verbatim.
    pub data_prep_time: Option<String>,
    /// Free-form description of the dataset size, carried verbatim.
    pub total_kv_pairs: Option<String>,
}

impl<'a> EngineRun<'a> {
    /// Create a run from log text with no metadata.
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            ..Self::default()
        }
    }

    /// Attach a data preparation time description.
    pub fn with_data_prep_time(mut self, value: impl Into<String>) -> Self {
        self.data_prep_time = Some(value.into());
        self
    }

    /// Attach a dataset size description.
    pub fn with_total_kv_pairs(mut self, value: impl Into<String>) -> Self {
        self.total_kv_pairs = Some(value.into());
        self
    }
}

/// Everything derived from one engine's log.
#[derive(Debug, Clone)]
pub struct EngineAnalysis {
    /// Display name.
    pub name: String,
    /// Data preparation time description, as supplied.
    pub data_prep_time: Option<String>,
    /// Dataset size description, as supplied.
    pub total_kv_pairs: Option<String>,
    /// Extracted records, grouped by category in canonical order.
    pub records: Vec<RoundRecord>,
    /// Per-category statistics.
    pub summary: EngineSummary,
    /// Figures across every round.
    pub overall: OverallSummary,
    /// Population phase summary parsed from the log.
    pub preparation: DataPreparation,
}

impl EngineAnalysis {
    /// Extract and summarize one engine's log.
    pub fn from_run(name: &str, run: EngineRun<'_>, config: &AnalyzerConfig) -> Self {
        let records = extract_all(run.text, &config.extractor);
        let summary = summarize(&records);
        let overall = summarize_overall(&records);
        let preparation = extract_preparation(run.text);
        info!(
            "{}: {} rounds across {} categories",
            name,
            records.len(),
            summary.categories.len()
        );
        Self {
            name: name.to_string(),
            data_prep_time: run.data_prep_time,
            total_kv_pairs: run.total_kv_pairs,
            records,
            summary,
            overall,
            preparation,
        }
    }
}

/// Result of analyzing two engines.
#[derive(Debug, Clone)]
pub struct Analysis {
    /// Reference engine.
    pub baseline: EngineAnalysis,
    /// Engine being evaluated against the baseline.
    pub candidate: EngineAnalysis,
    /// Cross-engine comparison per category.
    pub comparison: Comparison,
    /// Cross-engine comparison over all rounds.
    pub overall: OverallComparison,
}

impl Analysis {
    /// Run the full pipeline over two logs.
    ///
    /// Engine names come from `config.compare`.
    pub fn run(baseline: EngineRun<'_>, candidate: EngineRun<'_>, config: &AnalyzerConfig) -> Self {
        let baseline = EngineAnalysis::from_run(&config.compare.baseline_name, baseline, config);
        let candidate = EngineAnalysis::from_run(&config.compare.candidate_name, candidate, config);
        let comparison = compare(&baseline.summary, &candidate.summary, &config.compare);
        let overall = OverallComparison::between(&baseline.overall, &candidate.overall);
        info!(
            "compared {} categories, {} not comparable",
            comparison.entries.len(),
            comparison.not_comparable.len()
        );
        Self {
            baseline,
            candidate,
            comparison,
            overall,
        }
    }

    /// Both engines, baseline first.
    pub fn engines(&self) -> [&EngineAnalysis; 2] {
        [&self.baseline, &self.candidate]
    }
}
