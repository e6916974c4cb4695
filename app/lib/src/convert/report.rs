//! Markdown narrative report.

use std::fmt::Write;

use crate::analysis::{Analysis, EngineAnalysis};
use crate::record::Category;
use crate::stats::{verdict, ComparisonEntry, Metric};

/// Render an analysis as a Markdown report.
///
/// Sections: title, key findings, overall figures, data preparation, one
/// table per comparable category followed by its verdicts, and the categories
/// only one engine ran.
///
/// The preparation table shows what the logs say next to the metadata the
/// caller supplied; neither replaces the other.
pub fn render_report(analysis: &Analysis) -> String {
    let comparison = &analysis.comparison;
    let mut out = String::new();

    // Writing to a String cannot fail.
    let _ = writeln!(
        out,
        "# Benchmark Comparison: {} vs {}\n",
        comparison.candidate_name, comparison.baseline_name
    );

    out.push_str("## Key Findings\n\n");
    if comparison.entries.is_empty() {
        out.push_str("No category was run by both engines.\n");
    }
    for category in comparison.entries.keys() {
        if let Some(verdict) = comparison.verdict(*category, Metric::AvgLatency) {
            let _ = writeln!(out, "- **{}**: {}", category.title(), verdict);
        }
    }
    out.push('\n');

    render_overall(&mut out, analysis);
    render_preparation(&mut out, analysis);

    for (category, entry) in &comparison.entries {
        render_category(&mut out, analysis, *category, entry);
    }

    if !comparison.not_comparable.is_empty() {
        out.push_str("## Not Comparable\n\n");
        for category in &comparison.not_comparable {
            let owner = analysis
                .engines()
                .into_iter()
                .find(|engine| engine.summary.get(*category).is_some())
                .map(|engine| engine.name.as_str())
                .unwrap_or("neither engine");
            let _ = writeln!(
                out,
                "- {}: not comparable, only {} has rounds",
                category.title(),
                owner
            );
        }
        out.push('\n');
    }

    out
}

fn render_overall(out: &mut String, analysis: &Analysis) {
    out.push_str("## Overall\n\n");
    out.push_str("| Engine | Rounds | Test types | Avg latency (μs) | Avg throughput (ops/sec) |\n");
    out.push_str("|---|---|---|---|---|\n");
    for engine in analysis.engines() {
        let overall = &engine.overall;
        let types: Vec<&str> = overall.test_types.iter().map(|c| c.as_str()).collect();
        let _ = writeln!(
            out,
            "| {} | {} | {} | {} | {} |",
            engine.name,
            overall.total_rounds,
            if types.is_empty() { "-".to_string() } else { types.join(", ") },
            or_dash(overall.overall_avg_latency_us.map(|v| format!("{:.2}", v))),
            or_dash(overall.overall_avg_throughput_ops_sec.map(|v| format!("{:.2}", v))),
        );
    }
    out.push('\n');

    let comparison = &analysis.comparison;
    for (metric, m) in analysis.overall.metrics() {
        let _ = writeln!(
            out,
            "- Overall: {} ({:.2}x)",
            verdict(
                &comparison.candidate_name,
                &comparison.baseline_name,
                metric,
                m.percent_improvement
            ),
            m.improvement_factor
        );
    }
    if analysis.overall.metrics().next().is_some() {
        out.push('\n');
    }
}

fn render_preparation(out: &mut String, analysis: &Analysis) {
    out.push_str("## Data Preparation\n\n");
    out.push_str(
        "| Engine | KV pairs | Population time | Batch commits | Avg batch commit \
         | Dataset size (supplied) | Prep time (supplied) |\n",
    );
    out.push_str("|---|---|---|---|---|---|---|\n");
    for engine in analysis.engines() {
        let prep = &engine.preparation;
        let _ = writeln!(
            out,
            "| {} | {} | {} | {} | {} | {} | {} |",
            engine.name,
            or_dash(prep.total_kv_pairs.map(|n| n.to_string())),
            or_dash(prep.total_time_seconds.map(|s| format!("{} s", s))),
            prep.batch_commits,
            or_dash(prep.avg_commit_time_per_batch_ms.map(|ms| format!("{:.2} ms", ms))),
            or_dash(engine.total_kv_pairs.clone()),
            or_dash(engine.data_prep_time.clone()),
        );
    }
    out.push('\n');
}

fn or_dash(value: Option<String>) -> String {
    value.unwrap_or_else(|| "-".to_string())
}

fn render_category(
    out: &mut String,
    analysis: &Analysis,
    category: Category,
    entry: &ComparisonEntry,
) {
    let comparison = &analysis.comparison;
    let _ = writeln!(out, "## {}\n", category.title());
    let _ = writeln!(
        out,
        "Rounds: {} {}, {} {}\n",
        comparison.baseline_name,
        rounds(&analysis.baseline, category),
        comparison.candidate_name,
        rounds(&analysis.candidate, category)
    );

    let _ = writeln!(
        out,
        "| Metric | {} | {} | Factor | Improvement |",
        comparison.baseline_name, comparison.candidate_name
    );
    out.push_str("|---|---|---|---|---|\n");
    for (metric, m) in &entry.metrics {
        let _ = writeln!(
            out,
            "| {} ({}) | {:.2} | {:.2} | {:.2}x | {:+.1}% |",
            metric.label(),
            metric.unit(),
            m.baseline_mean,
            m.candidate_mean,
            m.improvement_factor,
            m.percent_improvement
        );
    }
    for metric in &entry.unavailable {
        let _ = writeln!(out, "| {} ({}) | - | - | n/a | n/a |", metric.label(), metric.unit());
    }
    out.push('\n');

    for metric in entry.metrics.keys() {
        if let Some(verdict) = comparison.verdict(category, *metric) {
            let _ = writeln!(out, "- {}", verdict);
        }
    }
    out.push('\n');
}

fn rounds(engine: &EngineAnalysis, category: Category) -> usize {
    engine.summary.get(category).map_or(0, |s| s.count)
}
