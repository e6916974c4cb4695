//! JSON export of summaries and comparisons.
//!
//! The analysis document has six top-level keys: `engines` (summaries by
//! engine name), `comparison` (entries by category), `not_comparable`,
//! `summary` (overall figures by engine name plus their comparison),
//! `metadata` and `preparation`. Absent statistics are omitted, never
//! written as `null` or `NaN`.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::analysis::Analysis;
use crate::error::Result;
use crate::extract::DataPreparation;
use crate::record::{Category, RoundRecord};
use crate::stats::{ComparisonEntry, EngineSummary, OverallComparison, OverallSummary};

#[derive(Serialize)]
struct AnalysisDocument<'a> {
    engines: BTreeMap<&'a str, &'a EngineSummary>,
    comparison: &'a BTreeMap<Category, ComparisonEntry>,
    not_comparable: &'a [Category],
    summary: SummaryView<'a>,
    metadata: BTreeMap<&'a str, MetadataView<'a>>,
    preparation: BTreeMap<&'a str, &'a DataPreparation>,
}

#[derive(Serialize)]
struct SummaryView<'a> {
    engines: BTreeMap<&'a str, &'a OverallSummary>,
    comparison: &'a OverallComparison,
}

#[derive(Serialize)]
struct MetadataView<'a> {
    role: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    data_prep_time: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    total_kv_pairs: Option<&'a str>,
}

/// Serialize a full analysis as pretty-printed JSON.
pub fn analysis_to_json(analysis: &Analysis) -> Result<String> {
    let mut engines = BTreeMap::new();
    let mut overall = BTreeMap::new();
    let mut metadata = BTreeMap::new();
    let mut preparation = BTreeMap::new();

    for (engine, role) in analysis.engines().into_iter().zip(["baseline", "candidate"]) {
        engines.insert(engine.name.as_str(), &engine.summary);
        overall.insert(engine.name.as_str(), &engine.overall);
        metadata.insert(
            engine.name.as_str(),
            MetadataView {
                role,
                data_prep_time: engine.data_prep_time.as_deref(),
                total_kv_pairs: engine.total_kv_pairs.as_deref(),
            },
        );
        if !engine.preparation.is_empty() {
            preparation.insert(engine.name.as_str(), &engine.preparation);
        }
    }

    let document = AnalysisDocument {
        engines,
        comparison: &analysis.comparison.entries,
        not_comparable: &analysis.comparison.not_comparable,
        summary: SummaryView {
            engines: overall,
            comparison: &analysis.overall,
        },
        metadata,
        preparation,
    };
    Ok(serde_json::to_string_pretty(&document)?)
}

/// Serialize one engine's summary as pretty-printed JSON.
///
/// # Examples
///
/// ```
/// use benchdiff::{summarize, Category, RoundRecord};
/// use benchdiff::convert::json::summary_to_json;
///
/// let summary = summarize(&[RoundRecord::new(Category::Read, 1, 10.0, 2.0, 5.0)]);
/// let json = summary_to_json(&summary).unwrap();
/// assert!(json.contains("\"read\""));
/// ```
pub fn summary_to_json(summary: &EngineSummary) -> Result<String> {
    Ok(serde_json::to_string_pretty(summary)?)
}

/// Serialize records as a JSON array, omitting absent fields.
pub fn records_to_json(records: &[RoundRecord]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}
