//! Per-category extraction plans.
//!
//! A plan is the ordered list of result lines a round of one category must
//! print, plus the mapping from the captured numbers to a [`RoundRecord`].

use crate::extract::matcher::{to_count, FieldMatcher};
use crate::extract::section::Section;
use crate::record::{Category, RoundRecord};

const READ_FIELDS: &[FieldMatcher] = &[
    FieldMatcher::new("read total", "Read {} KV pairs in {} ms"),
    FieldMatcher::new("average read latency", "Average read latency: {} μs"),
    FieldMatcher::new("tp99 read latency", "Tp99 read latency: {} μs"),
    FieldMatcher::new("read throughput", "Read throughput: {} ops/sec"),
];

const WRITE_FIELDS: &[FieldMatcher] = &[
    FieldMatcher::new("write total", "Wrote {} KV pairs in {} ms"),
    FieldMatcher::new("commit time", "Commit time: {} ms"),
    FieldMatcher::new("average write latency", "Average write latency: {} μs"),
    FieldMatcher::new("tp99 write latency", "Tp99 write latency: {} μs"),
    FieldMatcher::new("write throughput", "Write throughput: {} ops/sec"),
];

const UPDATE_FIELDS: &[FieldMatcher] = &[
    FieldMatcher::new("read total", "Read {} KV pairs in {} ms"),
    FieldMatcher::new("phase times", "Read time: {} ms, Write time: {} ms"),
    FieldMatcher::new("commit time", "Commit time: {} ms"),
    FieldMatcher::new("average read latency", "Average read latency: {} μs"),
    FieldMatcher::new("average write latency", "Average write latency: {} μs"),
    FieldMatcher::new("average mixed latency", "Average mixed latency: {} μs"),
    FieldMatcher::new("tp99 mixed latency", "Tp99 mixed latency: {} μs"),
    FieldMatcher::new("mixed throughput", "Mixed throughput: {} ops/sec"),
];

const MIXED_FIELDS: &[FieldMatcher] = &[
    FieldMatcher::new("operation split", "Mixed operations: {} reads, {} writes"),
    FieldMatcher::new("mixed total", "Total mixed time: {} ms"),
    FieldMatcher::new("commit time", "Commit time: {} ms"),
    FieldMatcher::new("average read latency", "Average read latency: {} μs"),
    FieldMatcher::new("average write latency", "Average write latency: {} μs"),
    FieldMatcher::new("average mixed latency", "Average mixed latency: {} μs"),
    FieldMatcher::new("tp99 mixed latency", "Tp99 mixed latency: {} μs"),
    FieldMatcher::new("mixed throughput", "Mixed throughput: {} ops/sec"),
];

/// Ordered field matchers for `category`.
pub fn fields(category: Category) -> &'static [FieldMatcher] {
    match category {
        Category::Read => READ_FIELDS,
        Category::Write => WRITE_FIELDS,
        Category::Update => UPDATE_FIELDS,
        Category::Mixed => MIXED_FIELDS,
    }
}

/// Why a round section did not produce a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Incomplete {
    /// The named result line was not found after the previous one.
    Missing(&'static str),
    /// All lines matched but an operation count was not an integer.
    BadCount,
}

/// Extract one record from a round section.
///
/// Every field line must appear, in plan order, inside the section.
pub fn extract_round(
    category: Category,
    section: &Section<'_>,
    ops_per_round: u64,
) -> Result<RoundRecord, Incomplete> {
    let mut values = Vec::new();
    let mut cursor = 0;
    for matcher in fields(category) {
        let (captured, next) = matcher
            .scan(section.body, cursor)
            .ok_or(Incomplete::Missing(matcher.label))?;
        values.extend(captured);
        cursor = next;
    }
    build(category, section.round, &values, ops_per_round)
}

fn build(
    category: Category,
    round: u32,
    values: &[f64],
    ops_per_round: u64,
) -> Result<RoundRecord, Incomplete> {
    let record = match (category, values) {
        (Category::Read, &[_, total, avg, tp99, throughput]) => {
            let mut r = RoundRecord::new(category, round, total, avg, tp99);
            r.read_time_ms = Some(total);
            r.avg_read_latency_us = Some(avg);
            r.throughput_ops_sec = Some(throughput);
            r.read_ops = ops_per_round;
            r
        }
        (Category::Write, &[_, total, commit, avg, tp99, throughput]) => {
            let mut r = RoundRecord::new(category, round, total, avg, tp99);
            r.commit_time_ms = Some(commit);
            r.write_time_ms = Some(total);
            r.avg_write_latency_us = Some(avg);
            r.throughput_ops_sec = Some(throughput);
            r.write_ops = ops_per_round;
            r
        }
        (
            Category::Update,
            &[_, _, read_time, write_time, commit, avg_read, avg_write, avg_mixed, tp99, throughput],
        ) => {
            let mut r =
                RoundRecord::new(category, round, read_time + write_time, avg_mixed, tp99);
            r.commit_time_ms = Some(commit);
            r.read_time_ms = Some(read_time);
            r.write_time_ms = Some(write_time);
            r.avg_read_latency_us = Some(avg_read);
            r.avg_write_latency_us = Some(avg_write);
            r.avg_mixed_latency_us = Some(avg_mixed);
            r.mixed_throughput_ops_sec = Some(throughput);
            r.read_ops = ops_per_round;
            r.write_ops = ops_per_round;
            r
        }
        (
            Category::Mixed,
            &[reads, writes, total, commit, avg_read, avg_write, avg_mixed, tp99, throughput],
        ) => {
            let mut r = RoundRecord::new(category, round, total, avg_mixed, tp99);
            r.commit_time_ms = Some(commit);
            r.avg_read_latency_us = Some(avg_read);
            r.avg_write_latency_us = Some(avg_write);
            r.avg_mixed_latency_us = Some(avg_mixed);
            r.throughput_ops_sec = Some(throughput);
            r.mixed_throughput_ops_sec = Some(throughput);
            r.read_ops = to_count(reads).ok_or(Incomplete::BadCount)?;
            r.write_ops = to_count(writes).ok_or(Incomplete::BadCount)?;
            r
        }
        // Capture counts are fixed by the templates above.
        _ => unreachable!("capture count mismatch for {} plan", category),
    };
    Ok(record)
}
