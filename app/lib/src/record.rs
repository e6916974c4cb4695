//! Canonical benchmark round records.
//!
//! Every round extracted from a log, whatever engine produced it, becomes one
//! [`RoundRecord`]. Which optional fields are set depends only on the round's
//! [`Category`]; [`Field::applies_to`] is the single source of truth for that.
//!
//! `tp99_mixed_latency_us` is carried by every category and mirrors
//! `tp99_latency_us`, so CSV exports keep the column filled for read and
//! write rows too.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Workload category of a benchmark round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Random point reads.
    Read,
    /// Random point writes followed by a commit.
    Write,
    /// Read a key set, then rewrite it and commit.
    Update,
    /// Interleaved reads and writes with a single commit.
    Mixed,
}

impl Category {
    /// All categories in canonical order.
    pub const ALL: [Category; 4] = [
        Category::Read,
        Category::Write,
        Category::Update,
        Category::Mixed,
    ];

    /// Lowercase name used in tables and structured exports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Read => "read",
            Category::Write => "write",
            Category::Update => "update",
            Category::Mixed => "mixed",
        }
    }

    /// Title used in round headings, e.g. `=== Read Test Round 3 ===`.
    pub fn heading(&self) -> &'static str {
        match self {
            Category::Read => "Read",
            Category::Write => "Write",
            Category::Update => "Update",
            Category::Mixed => "Mixed Read-Write",
        }
    }

    /// Capitalized name for reports.
    pub fn title(&self) -> &'static str {
        match self {
            Category::Read => "Read",
            Category::Write => "Write",
            Category::Update => "Update",
            Category::Mixed => "Mixed",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "read" => Ok(Category::Read),
            "write" => Ok(Category::Write),
            "update" => Ok(Category::Update),
            "mixed" => Ok(Category::Mixed),
            other => Err(format!("unknown category '{}'", other)),
        }
    }
}

/// Numeric field of a [`RoundRecord`].
///
/// Variants are declared in canonical column order; serialized names match
/// the record's field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// Wall-clock duration of the round's primary operation set.
    TotalTimeMs,
    /// Duration of the durability commit.
    CommitTimeMs,
    /// Duration of the read phase.
    ReadTimeMs,
    /// Duration of the write phase.
    WriteTimeMs,
    /// Primary average latency of the category.
    AvgLatencyUs,
    /// Average read latency.
    AvgReadLatencyUs,
    /// Average write latency.
    AvgWriteLatencyUs,
    /// Average latency over all operations of a blended workload.
    AvgMixedLatencyUs,
    /// 99th-percentile latency of the primary metric.
    Tp99LatencyUs,
    /// 99th-percentile latency of a blended workload.
    Tp99MixedLatencyUs,
    /// Operations per second.
    ThroughputOpsSec,
    /// Operations per second of a blended workload.
    MixedThroughputOpsSec,
    /// Read operations performed.
    ReadOps,
    /// Write operations performed.
    WriteOps,
}

/// Number of numeric record fields.
pub const FIELD_COUNT: usize = 14;

impl Field {
    /// All fields in canonical column order.
    pub const ALL: [Field; FIELD_COUNT] = [
        Field::TotalTimeMs,
        Field::CommitTimeMs,
        Field::ReadTimeMs,
        Field::WriteTimeMs,
        Field::AvgLatencyUs,
        Field::AvgReadLatencyUs,
        Field::AvgWriteLatencyUs,
        Field::AvgMixedLatencyUs,
        Field::Tp99LatencyUs,
        Field::Tp99MixedLatencyUs,
        Field::ThroughputOpsSec,
        Field::MixedThroughputOpsSec,
        Field::ReadOps,
        Field::WriteOps,
    ];

    /// Canonical column name.
    pub fn name(&self) -> &'static str {
        match self {
            Field::TotalTimeMs => "total_time_ms",
            Field::CommitTimeMs => "commit_time_ms",
            Field::ReadTimeMs => "read_time_ms",
            Field::WriteTimeMs => "write_time_ms",
            Field::AvgLatencyUs => "avg_latency_us",
            Field::AvgReadLatencyUs => "avg_read_latency_us",
            Field::AvgWriteLatencyUs => "avg_write_latency_us",
            Field::AvgMixedLatencyUs => "avg_mixed_latency_us",
            Field::Tp99LatencyUs => "tp99_latency_us",
            Field::Tp99MixedLatencyUs => "tp99_mixed_latency_us",
            Field::ThroughputOpsSec => "throughput_ops_sec",
            Field::MixedThroughputOpsSec => "mixed_throughput_ops_sec",
            Field::ReadOps => "read_ops",
            Field::WriteOps => "write_ops",
        }
    }

    /// Whether this field is an integer operation count.
    pub fn is_count(&self) -> bool {
        matches!(self, Field::ReadOps | Field::WriteOps)
    }

    /// Whether records of `category` carry a value for this field.
    pub fn applies_to(&self, category: Category) -> bool {
        use Category::*;
        match self {
            Field::TotalTimeMs
            | Field::AvgLatencyUs
            | Field::Tp99LatencyUs
            | Field::Tp99MixedLatencyUs
            | Field::ReadOps
            | Field::WriteOps => true,
            Field::CommitTimeMs => category != Read,
            Field::ReadTimeMs => matches!(category, Read | Update),
            Field::WriteTimeMs => matches!(category, Write | Update),
            Field::AvgReadLatencyUs => category != Write,
            Field::AvgWriteLatencyUs => category != Read,
            Field::AvgMixedLatencyUs | Field::MixedThroughputOpsSec => {
                matches!(category, Update | Mixed)
            }
            Field::ThroughputOpsSec => category != Update,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Field::ALL
            .iter()
            .copied()
            .find(|field| field.name() == s)
            .ok_or_else(|| format!("unknown field '{}'", s))
    }
}

/// One benchmark round in canonical form.
///
/// Optional fields are `None` exactly when [`Field::applies_to`] says the
/// category does not measure them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    /// Workload category.
    pub category: Category,
    /// Round ordinal as printed in the log (1-based).
    pub round_index: u32,
    /// Duration of the round's primary operation set in milliseconds.
    pub total_time_ms: f64,
    /// Commit duration in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub commit_time_ms: Option<f64>,
    /// Read phase duration in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub read_time_ms: Option<f64>,
    /// Write phase duration in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub write_time_ms: Option<f64>,
    /// Primary average latency in microseconds.
    pub avg_latency_us: f64,
    /// Average read latency in microseconds.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub avg_read_latency_us: Option<f64>,
    /// Average write latency in microseconds.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub avg_write_latency_us: Option<f64>,
    /// Average blended latency in microseconds.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub avg_mixed_latency_us: Option<f64>,
    /// 99th-percentile latency in microseconds.
    pub tp99_latency_us: f64,
    /// 99th-percentile blended latency in microseconds; equals `tp99_latency_us`.
    pub tp99_mixed_latency_us: f64,
    /// Throughput in operations per second.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub throughput_ops_sec: Option<f64>,
    /// Blended throughput in operations per second.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub mixed_throughput_ops_sec: Option<f64>,
    /// Read operations performed.
    pub read_ops: u64,
    /// Write operations performed.
    pub write_ops: u64,
}

impl RoundRecord {
    /// Create a record with every optional field unset and zero counts.
    ///
    /// `tp99_mixed_latency_us` takes the value of `tp99_latency_us`.
    pub fn new(
        category: Category,
        round_index: u32,
        total_time_ms: f64,
        avg_latency_us: f64,
        tp99_latency_us: f64,
    ) -> Self {
        Self {
            category,
            round_index,
            total_time_ms,
            commit_time_ms: None,
            read_time_ms: None,
            write_time_ms: None,
            avg_latency_us,
            avg_read_latency_us: None,
            avg_write_latency_us: None,
            avg_mixed_latency_us: None,
            tp99_latency_us,
            tp99_mixed_latency_us: tp99_latency_us,
            throughput_ops_sec: None,
            mixed_throughput_ops_sec: None,
            read_ops: 0,
            write_ops: 0,
        }
    }

    /// Value of `field`, or `None` if the record does not carry it.
    pub fn get(&self, field: Field) -> Option<f64> {
        match field {
            Field::TotalTimeMs => Some(self.total_time_ms),
            Field::CommitTimeMs => self.commit_time_ms,
            Field::ReadTimeMs => self.read_time_ms,
            Field::WriteTimeMs => self.write_time_ms,
            Field::AvgLatencyUs => Some(self.avg_latency_us),
            Field::AvgReadLatencyUs => self.avg_read_latency_us,
            Field::AvgWriteLatencyUs => self.avg_write_latency_us,
            Field::AvgMixedLatencyUs => self.avg_mixed_latency_us,
            Field::Tp99LatencyUs => Some(self.tp99_latency_us),
            Field::Tp99MixedLatencyUs => Some(self.tp99_mixed_latency_us),
            Field::ThroughputOpsSec => self.throughput_ops_sec,
            Field::MixedThroughputOpsSec => self.mixed_throughput_ops_sec,
            Field::ReadOps => Some(self.read_ops as f64),
            Field::WriteOps => Some(self.write_ops as f64),
        }
    }

    /// Check the per-category presence table and non-negativity.
    ///
    /// Returns the first offending field, if any. The round ordinal is not a
    /// field; see [`RoundRecord::is_conforming`].
    pub fn violation(&self) -> Option<Field> {
        Field::ALL.iter().copied().find(|&field| {
            let value = self.get(field);
            match value {
                Some(v) => !field.applies_to(self.category) || !v.is_finite() || v < 0.0,
                None => field.applies_to(self.category),
            }
        })
    }

    /// Whether the record satisfies the schema invariants, including a
    /// 1-based round ordinal.
    pub fn is_conforming(&self) -> bool {
        self.round_index > 0 && self.violation().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_record() -> RoundRecord {
        let mut record = RoundRecord::new(Category::Read, 1, 120.5, 1.2, 3.4);
        record.read_time_ms = Some(120.5);
        record.avg_read_latency_us = Some(1.2);
        record.throughput_ops_sec = Some(829_875.5);
        record.read_ops = 100_000;
        record
    }

    #[test]
    fn test_category_round_trip_str() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
        }
        assert!("scan".parse::<Category>().is_err());
    }

    #[test]
    fn test_field_names_are_unique_and_parse() {
        for field in Field::ALL {
            assert_eq!(field.name().parse::<Field>().unwrap(), field);
        }
        let mut names: Vec<_> = Field::ALL.iter().map(|f| f.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Field::ALL.len());
    }

    #[test]
    fn test_field_serde_name_matches_column() {
        for field in Field::ALL {
            let json = serde_json::to_string(&field).unwrap();
            assert_eq!(json, format!("\"{}\"", field.name()));
        }
    }

    #[test]
    fn test_presence_table() {
        assert!(!Field::CommitTimeMs.applies_to(Category::Read));
        assert!(Field::CommitTimeMs.applies_to(Category::Mixed));
        assert!(!Field::ReadTimeMs.applies_to(Category::Mixed));
        assert!(!Field::WriteTimeMs.applies_to(Category::Mixed));
        assert!(Field::ReadTimeMs.applies_to(Category::Update));
        assert!(!Field::ThroughputOpsSec.applies_to(Category::Update));
        assert!(Field::MixedThroughputOpsSec.applies_to(Category::Update));
        assert!(!Field::AvgWriteLatencyUs.applies_to(Category::Read));
        assert!(Field::Tp99MixedLatencyUs.applies_to(Category::Read));
        assert!(Field::Tp99MixedLatencyUs.applies_to(Category::Write));
    }

    #[test]
    fn test_tp99_mixed_mirrors_tp99() {
        let record = read_record();
        assert_eq!(record.get(Field::Tp99MixedLatencyUs), Some(3.4));
    }

    #[test]
    fn test_round_zero_is_not_a_field_violation() {
        let mut record = read_record();
        record.round_index = 0;
        assert_eq!(record.violation(), None);
        assert!(!record.is_conforming());
    }

    #[test]
    fn test_get_counts_as_floats() {
        let record = read_record();
        assert_eq!(record.get(Field::ReadOps), Some(100_000.0));
        assert_eq!(record.get(Field::WriteOps), Some(0.0));
        assert_eq!(record.get(Field::CommitTimeMs), None);
    }

    #[test]
    fn test_conforming_record() {
        assert!(read_record().is_conforming());
    }

    #[test]
    fn test_violation_for_inapplicable_field() {
        let mut record = read_record();
        record.commit_time_ms = Some(1.0);
        assert_eq!(record.violation(), Some(Field::CommitTimeMs));
    }

    #[test]
    fn test_violation_for_missing_field() {
        let mut record = read_record();
        record.throughput_ops_sec = None;
        assert_eq!(record.violation(), Some(Field::ThroughputOpsSec));
    }

    #[test]
    fn test_violation_for_negative_value() {
        let mut record = read_record();
        record.avg_read_latency_us = Some(-1.0);
        assert_eq!(record.violation(), Some(Field::AvgReadLatencyUs));
    }

    #[test]
    fn test_json_omits_absent_fields() {
        let json = serde_json::to_string(&read_record()).unwrap();
        assert!(json.contains("\"category\":\"read\""));
        assert!(!json.contains("commit_time_ms"));
        assert!(!json.contains("null"));
    }
}
