//! Cross-engine comparison.
//!
//! For every category both engines ran, each metric's means are compared.
//! Lower-is-better metrics (latency, time) use `baseline / candidate` as the
//! improvement factor and `(baseline - candidate) / baseline` as the
//! percentage; higher-is-better metrics (throughput) use the mirrored forms.
//! In both cases a positive percentage means the candidate did better.

use std::collections::BTreeMap;
use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::CompareConfig;
use crate::record::{Category, Field};
use crate::stats::summary::{CategorySummary, EngineSummary, OverallSummary};

/// Which way a metric improves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Smaller values are better (latency, time).
    LowerIsBetter,
    /// Larger values are better (throughput).
    HigherIsBetter,
}

/// A metric compared between engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Primary average latency.
    AvgLatency,
    /// 99th-percentile latency.
    Tp99Latency,
    /// Round duration.
    TotalTime,
    /// Operations per second.
    Throughput,
    /// Commit duration.
    CommitTime,
}

impl Metric {
    /// All metrics in report order.
    pub const ALL: [Metric; 5] = [
        Metric::AvgLatency,
        Metric::Tp99Latency,
        Metric::TotalTime,
        Metric::Throughput,
        Metric::CommitTime,
    ];

    /// Record field the metric is computed from.
    pub fn field(&self) -> Field {
        match self {
            Metric::AvgLatency => Field::AvgLatencyUs,
            Metric::Tp99Latency => Field::Tp99LatencyUs,
            Metric::TotalTime => Field::TotalTimeMs,
            Metric::Throughput => Field::ThroughputOpsSec,
            Metric::CommitTime => Field::CommitTimeMs,
        }
    }

    /// Direction of improvement.
    pub fn direction(&self) -> Direction {
        match self {
            Metric::Throughput => Direction::HigherIsBetter,
            _ => Direction::LowerIsBetter,
        }
    }

    /// Row label for reports.
    pub fn label(&self) -> &'static str {
        match self {
            Metric::AvgLatency => "Average Latency",
            Metric::Tp99Latency => "TP99 Latency",
            Metric::TotalTime => "Total Time",
            Metric::Throughput => "Throughput",
            Metric::CommitTime => "Commit Time",
        }
    }

    /// Unit of the metric's values.
    pub fn unit(&self) -> &'static str {
        match self {
            Metric::AvgLatency | Metric::Tp99Latency => "μs",
            Metric::TotalTime | Metric::CommitTime => "ms",
            Metric::Throughput => "ops/sec",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let noun = match self {
            Metric::AvgLatency => "average latency",
            Metric::Tp99Latency => "tp99 latency",
            Metric::TotalTime => "total time",
            Metric::Throughput => "throughput",
            Metric::CommitTime => "commit time",
        };
        f.write_str(noun)
    }
}

/// Comparison of one metric's means.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricComparison {
    /// Baseline engine's mean.
    pub baseline_mean: f64,
    /// Candidate engine's mean.
    pub candidate_mean: f64,
    /// Ratio oriented so that values above 1.0 favor the candidate.
    pub improvement_factor: f64,
    /// Relative change against the baseline; positive favors the candidate.
    pub percent_improvement: f64,
}

impl MetricComparison {
    /// Compare two means along `direction`.
    ///
    /// Returns `None` when a denominator is zero or a result is not finite.
    pub fn compute(direction: Direction, baseline: f64, candidate: f64) -> Option<Self> {
        let (factor_num, factor_den, delta) = match direction {
            Direction::LowerIsBetter => (baseline, candidate, baseline - candidate),
            Direction::HigherIsBetter => (candidate, baseline, candidate - baseline),
        };
        if factor_den == 0.0 || baseline == 0.0 {
            return None;
        }
        let improvement_factor = factor_num / factor_den;
        let percent_improvement = delta / baseline * 100.0;
        if !improvement_factor.is_finite() || !percent_improvement.is_finite() {
            return None;
        }
        Some(Self {
            baseline_mean: baseline,
            candidate_mean: candidate,
            improvement_factor,
            percent_improvement,
        })
    }
}

/// Comparison of one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonEntry {
    /// Category compared.
    pub category: Category,
    /// Metrics both engines report, with a usable comparison.
    pub metrics: BTreeMap<Metric, MetricComparison>,
    /// Metrics both engines report whose comparison hit a zero denominator.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub unavailable: Vec<Metric>,
}

impl ComparisonEntry {
    /// Compare two summaries of the same category.
    pub fn between(baseline: &CategorySummary, candidate: &CategorySummary) -> Self {
        let mut metrics = BTreeMap::new();
        let mut unavailable = Vec::new();
        for metric in Metric::ALL {
            let field = metric.field();
            let (Some(b), Some(c)) = (baseline.mean(field), candidate.mean(field)) else {
                continue;
            };
            match MetricComparison::compute(metric.direction(), b, c) {
                Some(comparison) => {
                    metrics.insert(metric, comparison);
                }
                None => {
                    debug!(
                        "{} {}: zero denominator, comparison unavailable",
                        baseline.category, metric
                    );
                    unavailable.push(metric);
                }
            }
        }
        Self {
            category: baseline.category,
            metrics,
            unavailable,
        }
    }

    /// Comparison for `metric`, if available.
    pub fn get(&self, metric: Metric) -> Option<&MetricComparison> {
        self.metrics.get(&metric)
    }
}

/// Comparison of two engines across categories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    /// Baseline engine's display name.
    pub baseline_name: String,
    /// Candidate engine's display name.
    pub candidate_name: String,
    /// Entries for categories both engines ran.
    pub entries: BTreeMap<Category, ComparisonEntry>,
    /// Categories only one engine ran.
    pub not_comparable: Vec<Category>,
}

impl Comparison {
    /// Entry for `category`, if both engines ran it.
    pub fn get(&self, category: Category) -> Option<&ComparisonEntry> {
        self.entries.get(&category)
    }

    /// One-line, direction-aware verdict for a metric of a category.
    pub fn verdict(&self, category: Category, metric: Metric) -> Option<String> {
        let comparison = self.get(category)?.get(metric)?;
        Some(verdict(
            &self.candidate_name,
            &self.baseline_name,
            metric,
            comparison.percent_improvement,
        ))
    }
}

/// Engine-wide comparison of average latency and throughput.
///
/// Built from [`OverallSummary`] means, so it covers every round of each
/// engine, including categories the other engine never ran.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverallComparison {
    /// Mean latency over all rounds; lower is better.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub avg_latency: Option<MetricComparison>,
    /// Mean throughput over all rounds; higher is better.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub throughput: Option<MetricComparison>,
}

impl OverallComparison {
    /// Compare two engines' overall summaries.
    pub fn between(baseline: &OverallSummary, candidate: &OverallSummary) -> Self {
        let pair = |metric: Metric, b: Option<f64>, c: Option<f64>| -> Option<MetricComparison> {
            MetricComparison::compute(metric.direction(), b?, c?)
        };
        Self {
            avg_latency: pair(
                Metric::AvgLatency,
                baseline.overall_avg_latency_us,
                candidate.overall_avg_latency_us,
            ),
            throughput: pair(
                Metric::Throughput,
                baseline.overall_avg_throughput_ops_sec,
                candidate.overall_avg_throughput_ops_sec,
            ),
        }
    }

    /// Available comparisons, latency first.
    pub fn metrics(&self) -> impl Iterator<Item = (Metric, &MetricComparison)> {
        [
            (Metric::AvgLatency, self.avg_latency.as_ref()),
            (Metric::Throughput, self.throughput.as_ref()),
        ]
        .into_iter()
        .filter_map(|(metric, comparison)| comparison.map(|c| (metric, c)))
    }
}

/// Phrase a percentage improvement from the candidate's point of view.
///
/// A percentage that prints as `0.0` reads as no difference.
pub fn verdict(candidate: &str, baseline: &str, metric: Metric, percent: f64) -> String {
    let magnitude = format!("{:.1}", percent.abs());
    if magnitude == "0.0" {
        format!("{} and {} show the same {}", candidate, baseline, metric)
    } else if percent > 0.0 {
        format!("{} shows {}% better {} than {}", candidate, magnitude, metric, baseline)
    } else {
        format!("{} shows {}% worse {} than {}", candidate, magnitude, metric, baseline)
    }
}

/// Compare two engines' summaries.
pub fn compare(
    baseline: &EngineSummary,
    candidate: &EngineSummary,
    config: &CompareConfig,
) -> Comparison {
    let mut entries = BTreeMap::new();
    let mut not_comparable = Vec::new();
    for category in Category::ALL {
        match (baseline.get(category), candidate.get(category)) {
            (Some(b), Some(c)) => {
                entries.insert(category, ComparisonEntry::between(b, c));
            }
            (None, None) => {}
            _ => {
                debug!("{} rounds present for one engine only", category);
                not_comparable.push(category);
            }
        }
    }
    Comparison {
        baseline_name: config.baseline_name.clone(),
        candidate_name: config.candidate_name.clone(),
        entries,
        not_comparable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RoundRecord;
    use crate::stats::summary::summarize;

    fn engine(latency: f64, throughput: Option<f64>) -> EngineSummary {
        let mut r = RoundRecord::new(Category::Read, 1, latency * 10.0, latency, latency * 3.0);
        r.read_time_ms = Some(latency * 10.0);
        r.avg_read_latency_us = Some(latency);
        r.throughput_ops_sec = throughput;
        summarize(&[r])
    }

    #[test]
    fn test_lower_is_better_sign() {
        let c = MetricComparison::compute(Direction::LowerIsBetter, 100.0, 50.0).unwrap();
        assert_eq!(c.improvement_factor, 2.0);
        assert_eq!(c.percent_improvement, 50.0);

        let c = MetricComparison::compute(Direction::LowerIsBetter, 50.0, 100.0).unwrap();
        assert_eq!(c.improvement_factor, 0.5);
        assert_eq!(c.percent_improvement, -100.0);
    }

    #[test]
    fn test_higher_is_better_sign() {
        let c = MetricComparison::compute(Direction::HigherIsBetter, 1000.0, 1500.0).unwrap();
        assert_eq!(c.improvement_factor, 1.5);
        assert_eq!(c.percent_improvement, 50.0);

        let c = MetricComparison::compute(Direction::HigherIsBetter, 1000.0, 500.0).unwrap();
        assert_eq!(c.improvement_factor, 0.5);
        assert_eq!(c.percent_improvement, -50.0);
    }

    #[test]
    fn test_zero_denominators() {
        assert!(MetricComparison::compute(Direction::LowerIsBetter, 0.0, 5.0).is_none());
        assert!(MetricComparison::compute(Direction::LowerIsBetter, 5.0, 0.0).is_none());
        assert!(MetricComparison::compute(Direction::HigherIsBetter, 0.0, 5.0).is_none());
        // Candidate zero throughput is a valid, total regression.
        let c = MetricComparison::compute(Direction::HigherIsBetter, 5.0, 0.0).unwrap();
        assert_eq!(c.percent_improvement, -100.0);
    }

    #[test]
    fn test_compare_latency_scenario() {
        let comparison = compare(
            &engine(100.0, Some(1.0)),
            &engine(50.0, Some(2.0)),
            &CompareConfig::default(),
        );
        let entry = comparison.get(Category::Read).unwrap();
        let latency = entry.get(Metric::AvgLatency).unwrap();
        assert_eq!(latency.improvement_factor, 2.0);
        assert_eq!(latency.percent_improvement, 50.0);
        let throughput = entry.get(Metric::Throughput).unwrap();
        assert_eq!(throughput.percent_improvement, 100.0);
        // Read rounds never commit.
        assert!(entry.get(Metric::CommitTime).is_none());
        assert!(entry.unavailable.is_empty());
    }

    #[test]
    fn test_metric_absent_on_one_side_is_omitted() {
        let comparison = compare(
            &engine(10.0, Some(1.0)),
            &engine(10.0, None),
            &CompareConfig::default(),
        );
        let entry = comparison.get(Category::Read).unwrap();
        assert!(entry.get(Metric::Throughput).is_none());
        assert!(!entry.unavailable.contains(&Metric::Throughput));
    }

    #[test]
    fn test_zero_mean_is_flagged_unavailable() {
        let comparison = compare(
            &engine(10.0, Some(0.0)),
            &engine(10.0, Some(5.0)),
            &CompareConfig::default(),
        );
        let entry = comparison.get(Category::Read).unwrap();
        assert!(entry.get(Metric::Throughput).is_none());
        assert_eq!(entry.unavailable, vec![Metric::Throughput]);
    }

    #[test]
    fn test_one_sided_category_not_comparable() {
        let comparison = compare(
            &engine(10.0, None),
            &EngineSummary::default(),
            &CompareConfig::default(),
        );
        assert!(comparison.entries.is_empty());
        assert_eq!(comparison.not_comparable, vec![Category::Read]);
        assert_eq!(comparison.verdict(Category::Read, Metric::AvgLatency), None);
    }

    #[test]
    fn test_verdict_wording() {
        assert_eq!(
            verdict("RocksDB", "MDBX", Metric::AvgLatency, 50.0),
            "RocksDB shows 50.0% better average latency than MDBX"
        );
        assert_eq!(
            verdict("RocksDB", "MDBX", Metric::Throughput, -12.34),
            "RocksDB shows 12.3% worse throughput than MDBX"
        );
        assert_eq!(
            verdict("RocksDB", "MDBX", Metric::TotalTime, 0.0),
            "RocksDB and MDBX show the same total time"
        );
    }

    #[test]
    fn test_overall_comparison_directions() {
        use crate::stats::summary::summarize_overall;

        let round = |latency: f64, throughput: f64| {
            let mut r = RoundRecord::new(Category::Read, 1, 1.0, latency, latency);
            r.read_time_ms = Some(1.0);
            r.avg_read_latency_us = Some(latency);
            r.throughput_ops_sec = Some(throughput);
            r
        };
        let baseline = summarize_overall(&[round(100.0, 1000.0), round(300.0, 3000.0)]);
        let candidate = summarize_overall(&[round(50.0, 3000.0)]);
        let overall = OverallComparison::between(&baseline, &candidate);

        let latency = overall.avg_latency.unwrap();
        assert_eq!(latency.baseline_mean, 200.0);
        assert_eq!(latency.improvement_factor, 4.0);
        assert_eq!(latency.percent_improvement, 75.0);
        let throughput = overall.throughput.unwrap();
        assert_eq!(throughput.improvement_factor, 1.5);
        assert_eq!(throughput.percent_improvement, 50.0);
        assert_eq!(overall.metrics().count(), 2);
    }

    #[test]
    fn test_overall_comparison_without_rounds() {
        use crate::stats::summary::summarize_overall;

        let overall = OverallComparison::between(&summarize_overall(&[]), &summarize_overall(&[]));
        assert_eq!(overall, OverallComparison::default());
        assert_eq!(overall.metrics().count(), 0);
    }

    #[test]
    fn test_verdict_for_differences_below_display_precision() {
        for percent in [-0.04, 0.04, -0.0] {
            assert_eq!(
                verdict("c", "b", Metric::AvgLatency, percent),
                "c and b show the same average latency"
            );
        }
        assert_eq!(
            verdict("c", "b", Metric::AvgLatency, -0.06),
            "c shows 0.1% worse average latency than b"
        );
    }
}
