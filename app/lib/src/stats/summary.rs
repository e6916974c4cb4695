//! Per-category summary statistics.
//!
//! Statistics are computed over the records where a field is present; absent
//! values are excluded rather than counted as zero, and a field with no
//! present values gets no entry at all.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::record::{Category, Field, RoundRecord};

/// Mean, spread and range of one field.
///
/// `std_dev` is the sample standard deviation (n - 1 denominator), and 0.0
/// for a single value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldStats {
    /// Number of values the statistics cover.
    pub count: usize,
    /// Arithmetic mean.
    pub mean: f64,
    /// Sample standard deviation.
    pub std_dev: f64,
    /// Smallest value.
    pub min: f64,
    /// Largest value.
    pub max: f64,
}

impl FieldStats {
    /// Compute statistics over `values`, or `None` if there are none.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let count = values.len();
        let mean = values.iter().sum::<f64>() / count as f64;
        let std_dev = if count > 1 {
            let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
            (sum_sq / (count - 1) as f64).sqrt()
        } else {
            0.0
        };
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Some(Self {
            count,
            mean,
            std_dev,
            min,
            max,
        })
    }
}

/// Summary of one engine's rounds of one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    /// Category summarized.
    pub category: Category,
    /// Number of rounds.
    pub count: usize,
    /// Statistics for every field present in at least one round.
    pub fields: BTreeMap<Field, FieldStats>,
}

impl CategorySummary {
    /// Statistics for `field`, if any round carried it.
    pub fn get(&self, field: Field) -> Option<&FieldStats> {
        self.fields.get(&field)
    }

    /// Mean of `field`, if any round carried it.
    pub fn mean(&self, field: Field) -> Option<f64> {
        self.get(field).map(|stats| stats.mean)
    }
}

/// Summaries of every category one engine ran.
///
/// Categories with no complete rounds are absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EngineSummary {
    /// Summaries keyed by category.
    pub categories: BTreeMap<Category, CategorySummary>,
}

impl EngineSummary {
    /// Summary for `category`, if the engine has rounds of it.
    pub fn get(&self, category: Category) -> Option<&CategorySummary> {
        self.categories.get(&category)
    }

    /// Whether no category has any rounds.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Total rounds across categories.
    pub fn total_rounds(&self) -> usize {
        self.categories.values().map(|s| s.count).sum()
    }
}

/// Summarize the records of `category` found in `records`.
///
/// Returns `None` when there are no such records.
pub fn summarize_category(category: Category, records: &[RoundRecord]) -> Option<CategorySummary> {
    let rounds: Vec<&RoundRecord> = records.iter().filter(|r| r.category == category).collect();
    if rounds.is_empty() {
        return None;
    }

    let mut fields = BTreeMap::new();
    for field in Field::ALL {
        let values: Vec<f64> = rounds.iter().filter_map(|r| r.get(field)).collect();
        if let Some(stats) = FieldStats::from_values(&values) {
            fields.insert(field, stats);
        }
    }

    Some(CategorySummary {
        category,
        count: rounds.len(),
        fields,
    })
}

/// Engine-wide figures over every round, whatever its category.
///
/// Means cover the rounds that carry the field; update rounds have no
/// `throughput_ops_sec` and so do not count towards the throughput mean.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallSummary {
    /// Number of rounds.
    pub total_rounds: usize,
    /// Categories with at least one round, in canonical order.
    pub test_types: Vec<Category>,
    /// Mean primary average latency in microseconds.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub overall_avg_latency_us: Option<f64>,
    /// Mean throughput in operations per second.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub overall_avg_throughput_ops_sec: Option<f64>,
}

/// Summarize one engine's rounds regardless of category.
pub fn summarize_overall(records: &[RoundRecord]) -> OverallSummary {
    let mean = |field: Field| {
        let values: Vec<f64> = records.iter().filter_map(|r| r.get(field)).collect();
        FieldStats::from_values(&values).map(|stats| stats.mean)
    };
    OverallSummary {
        total_rounds: records.len(),
        test_types: Category::ALL
            .into_iter()
            .filter(|c| records.iter().any(|r| r.category == *c))
            .collect(),
        overall_avg_latency_us: mean(Field::AvgLatencyUs),
        overall_avg_throughput_ops_sec: mean(Field::ThroughputOpsSec),
    }
}

/// Summarize every category present in `records`.
pub fn summarize(records: &[RoundRecord]) -> EngineSummary {
    let categories = Category::ALL
        .iter()
        .filter_map(|&category| summarize_category(category, records).map(|s| (category, s)))
        .collect();
    EngineSummary { categories }
}
