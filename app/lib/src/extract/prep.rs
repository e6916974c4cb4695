//! Data preparation summary.
//!
//! Before the timed rounds, each benchmark populates its database and prints
//! per-batch commit times and a final total. These are summarized here.

use serde::{Deserialize, Serialize};

use crate::extract::matcher::{to_count, FieldMatcher};

const POPULATED: FieldMatcher = FieldMatcher::new(
    "population summary",
    "Database populated with {} KV pairs in {} seconds",
);

/// Batch commit progress lines, in the two spellings the engines use.
const BATCH_COMMITS: [FieldMatcher; 2] = [
    FieldMatcher::new("batch commit", "batch commit: {} ms"),
    FieldMatcher::new("batch completed", "(commit: {} ms)"),
];

/// Summary of the database population phase.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataPreparation {
    /// Key-value pairs inserted.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub total_kv_pairs: Option<u64>,
    /// Wall-clock population time in seconds.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub total_time_seconds: Option<u64>,
    /// Number of batch commit lines found.
    pub batch_commits: usize,
    /// Sum of the batch commit times.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub total_commit_time_ms: Option<f64>,
    /// Mean batch commit time.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub avg_commit_time_per_batch_ms: Option<f64>,
}

impl DataPreparation {
    /// Whether the log contained no preparation output at all.
    pub fn is_empty(&self) -> bool {
        self.total_kv_pairs.is_none() && self.batch_commits == 0
    }
}

/// Summarize the population phase of a benchmark log.
///
/// Never fails; missing lines leave the corresponding fields unset.
pub fn extract_preparation(text: &str) -> DataPreparation {
    let mut prep = DataPreparation::default();

    if let Some((values, _)) = POPULATED.scan(text, 0) {
        prep.total_kv_pairs = to_count(values[0]);
        prep.total_time_seconds = to_count(values[1]);
    }

    // A line carries at most one of the spellings, so check them per line.
    let mut total = 0.0;
    for line in text.lines() {
        if let Some(values) = BATCH_COMMITS.iter().find_map(|m| m.match_line(line)) {
            total += values[0];
            prep.batch_commits += 1;
        }
    }
    if prep.batch_commits > 0 {
        prep.total_commit_time_ms = Some(total);
        prep.avg_commit_time_per_batch_ms = Some(total / prep.batch_commits as f64);
    }

    prep
}
