//! Aggregation and comparison.
//!
//! [`summary`] reduces one engine's records to per-category statistics;
//! [`compare`] derives cross-engine ratios and percentages from two such
//! summaries.

pub mod compare;
pub mod summary;

pub use compare::{
    compare, verdict, Comparison, ComparisonEntry, Direction, Metric, MetricComparison,
    OverallComparison,
};
pub use summary::{
    summarize, summarize_category, summarize_overall, CategorySummary, EngineSummary,
    FieldStats, OverallSummary,
};
