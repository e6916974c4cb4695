//! Exporters for records, summaries and comparisons.
//!
//! CSV carries raw records and can be read back; JSON and Markdown are
//! write-only views of an [`Analysis`](crate::analysis::Analysis).

pub mod csv;
pub mod json;
pub mod report;

pub use self::csv::{records_from_csv, records_to_csv, write_records};
pub use self::json::{analysis_to_json, records_to_json, summary_to_json};
pub use self::report::render_report;
