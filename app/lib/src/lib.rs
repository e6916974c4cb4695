//! # benchdiff
//!
//! Extraction, aggregation and comparison of key-value store benchmark logs.
//!
//! A benchmark log is free text: progress lines, headings such as
//! `=== Read Test Round 3 ===`, and result lines such as
//! `✓ Average read latency: 12.34 μs`. This library turns such a log into
//! typed per-round records, summarizes them per category, and compares two
//! engines' summaries with direction-aware ratios.
//!
//! ## Features
//!
//! - **Bounded extraction**: each round is parsed only within its own section,
//!   so a truncated round is skipped instead of borrowing values from the next
//! - **Explicit presence**: every [`Field`] is either present or absent for a
//!   given [`Category`]; absent never means zero
//! - **Direction-aware comparison**: latency and time are lower-is-better,
//!   throughput is higher-is-better, and a positive percentage always favors
//!   the candidate
//! - **Exporters**: CSV (round-trippable), JSON and Markdown
//! - **Thread-safe**: all public types implement `Send + Sync`
//!
//! ## Quick Start
//!
//! ### Extraction
//!
//! ```rust
//! use benchdiff::{extract_read, summarize, ExtractorConfig, Field};
//!
//! let log = "\
//! === Read Test Round 1 ===
//! ✓ Read 100000 KV pairs in 200.00 ms
//! ✓ Average read latency: 10.00 μs
//! ✓ Tp99 read latency: 30.00 μs
//! ✓ Read throughput: 500000.00 ops/sec
//! === Read Test Round 2 ===
//! ✓ Read 100000 KV pairs in 210.00 ms
//! ✓ Average read latency: 20.00 μs
//! ✓ Tp99 read latency: 40.00 μs
//! ✓ Read throughput: 476190.48 ops/sec
//! ";
//!
//! let records: Vec<_> = extract_read(log, &ExtractorConfig::default()).collect();
//! assert_eq!(records.len(), 2);
//!
//! let summary = summarize(&records);
//! let latency = summary.categories.values().next().unwrap().get(Field::AvgLatencyUs).unwrap();
//! assert_eq!(latency.mean, 15.0);
//! assert_eq!(latency.min, 10.0);
//! assert_eq!(latency.max, 20.0);
//! ```
//!
//! ### Comparison
//!
//! ```rust
//! use benchdiff::{Analysis, AnalyzerConfig, Category, CompareConfig, EngineRun, Metric};
//!
//! let baseline = "\
//! === Read Test Round 1 ===
//! ✓ Read 100000 KV pairs in 200.00 ms
//! ✓ Average read latency: 100.00 μs
//! ✓ Tp99 read latency: 300.00 μs
//! ✓ Read throughput: 500000.00 ops/sec
//! ";
//! let candidate = baseline.replace("100.00 μs", "50.00 μs");
//!
//! let config = AnalyzerConfig::new().with_compare(
//!     CompareConfig::new()
//!         .with_baseline_name("MDBX")
//!         .with_candidate_name("RocksDB"),
//! );
//! let analysis = Analysis::run(EngineRun::new(baseline), EngineRun::new(&candidate), &config);
//!
//! assert_eq!(
//!     analysis.comparison.verdict(Category::Read, Metric::AvgLatency).unwrap(),
//!     "RocksDB shows 50.0% better average latency than MDBX"
//! );
//! ```
//!
//! ### Error Handling
//!
//! Extraction and statistics never fail. Only re-importing CSV, loading
//! configuration and serialization return [`Result`]:
//!
//! ```rust
//! use benchdiff::{records_from_csv, BenchError};
//!
//! match records_from_csv("category,round_index\nread,1\n") {
//!     Err(BenchError::CsvParseError { line, message, .. }) => {
//!         assert_eq!(line, 1);
//!         assert!(message.contains("Missing column"));
//!     }
//!     other => panic!("unexpected: {:?}", other),
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Module declarations
pub mod analysis;
pub mod config;
pub mod convert;
pub mod error;
pub mod extract;
pub mod record;
pub mod stats;

// Re-exports for convenience
pub use analysis::{Analysis, EngineAnalysis, EngineRun};
pub use config::{AnalyzerConfig, CompareConfig, ExtractorConfig};
pub use convert::{
    analysis_to_json, records_from_csv, records_to_csv, records_to_json, render_report,
    summary_to_json, write_records,
};
pub use error::{BenchError, Result};
pub use extract::{
    extract, extract_all, extract_mixed, extract_preparation, extract_read, extract_update,
    extract_write, DataPreparation, FieldMatcher, Rounds,
};
pub use record::{Category, Field, RoundRecord, FIELD_COUNT};
pub use stats::{
    compare, summarize, summarize_category, summarize_overall, verdict, CategorySummary,
    Comparison, ComparisonEntry, Direction, EngineSummary, FieldStats, Metric, MetricComparison,
    OverallComparison, OverallSummary,
};
