//! Integration tests for record extraction over complete benchmark logs.

use benchdiff::{
    extract, extract_all, extract_mixed, extract_preparation, extract_read, extract_update,
    extract_write, summarize, Category, ExtractorConfig, Field,
};
use proptest::prelude::*;

/// A log shaped like a real run: population, then two rounds of every
/// category, with one truncated write round and progress noise in between.
const FULL_LOG: &str = "\
[2025-06-01 10:00:00] Starting benchmark
Batch 1/3 completed (commit: 100.00 ms)
Batch 2/3 completed (commit: 110.00 ms)
Batch 3/3 completed (commit: 120.00 ms)
✓ Database populated with 300000 KV pairs in 12 seconds

=== Read Test Round 1 ===
Reading 100000 randomly selected KV pairs...
✓ Read 100000 KV pairs in 200.00 ms
✓ Average read latency: 10.00 μs
✓ Tp99 read latency: 30.00 μs
✓ Read throughput: 500000.00 ops/sec

=== Read Test Round 2 ===
✓ Read 100000 KV pairs in 220.00 ms
✓ Average read latency: 20.00 µs
✓ Tp99 read latency: 50.00 us
✓ Read throughput: 454545.45 ops/sec

=== Write Test Round 1 ===
✓ Wrote 100000 KV pairs in 900.00 ms
✓ Commit time: 50.00 ms
✓ Average write latency: 9.00 μs
✓ Tp99 write latency: 40.00 μs
✓ Write throughput: 111111.11 ops/sec

=== Write Test Round 2 ===
✓ Wrote 100000 KV pairs in 950.00 ms
✓ Commit time: 55.00 ms

=== Update Test Round 1 ===
✓ Read 100000 KV pairs in 300.00 ms
✓ Read time: 300.00 ms, Write time: 150.00 ms
✓ Commit time: 60.00 ms
✓ Average read latency: 3.00 μs
✓ Average write latency: 1.50 μs
✓ Average mixed latency: 2.25 μs
✓ Tp99 mixed latency: 9.00 μs
✓ Mixed throughput: 222222.22 ops/sec

=== Mixed Read-Write Test Round 1 ===
Mixed operations: 80000 reads, 20000 writes
✓ Total mixed time: 500.00 ms
✓ Commit time: 12.00 ms
✓ Average read latency: 4.00 μs
✓ Average write latency: 6.00 μs
✓ Average mixed latency: 4.40 μs
✓ Tp99 mixed latency: 20.00 μs
✓ Mixed throughput: 200000.00 ops/sec
";

#[test]
fn test_extract_every_category() {
    let config = ExtractorConfig::default();
    assert_eq!(extract_read(FULL_LOG, &config).count(), 2);
    assert_eq!(extract_write(FULL_LOG, &config).count(), 1);
    assert_eq!(extract_update(FULL_LOG, &config).count(), 1);
    assert_eq!(extract_mixed(FULL_LOG, &config).count(), 1);

    let all = extract_all(FULL_LOG, &config);
    assert_eq!(all.len(), 5);
    assert!(all.iter().all(|r| r.is_conforming()));
}

#[test]
fn test_read_summary_end_to_end() {
    let records: Vec<_> = extract_read(FULL_LOG, &ExtractorConfig::default()).collect();
    let summary = summarize(&records);
    let read = summary.get(Category::Read).unwrap();
    let latency = read.get(Field::AvgLatencyUs).unwrap();

    assert_eq!(read.count, 2);
    assert_eq!(latency.count, 2);
    assert_eq!(latency.mean, 15.0);
    assert_eq!(latency.min, 10.0);
    assert_eq!(latency.max, 20.0);
}

#[test]
fn test_micro_unit_variants() {
    let records: Vec<_> = extract_read(FULL_LOG, &ExtractorConfig::default()).collect();
    assert_eq!(records[1].avg_latency_us, 20.0);
    assert_eq!(records[1].tp99_latency_us, 50.0);
}

#[test]
fn test_truncated_round_is_skipped_not_padded() {
    let writes: Vec<_> = extract_write(FULL_LOG, &ExtractorConfig::default()).collect();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].round_index, 1);
    assert_eq!(writes[0].commit_time_ms, Some(50.0));
}

#[test]
fn test_update_and_mixed_fields() {
    let config = ExtractorConfig::default();
    let update = extract_update(FULL_LOG, &config).next().unwrap();
    assert_eq!(update.total_time_ms, 450.0);
    assert_eq!(update.read_time_ms, Some(300.0));
    assert_eq!(update.write_time_ms, Some(150.0));
    assert_eq!(update.throughput_ops_sec, None);
    assert_eq!(update.tp99_mixed_latency_us, 9.0);

    let mixed = extract_mixed(FULL_LOG, &config).next().unwrap();
    assert_eq!((mixed.read_ops, mixed.write_ops), (80_000, 20_000));
    assert_eq!(mixed.throughput_ops_sec, Some(200_000.0));
    assert_eq!(mixed.mixed_throughput_ops_sec, Some(200_000.0));
}

#[test]
fn test_ops_per_round_from_config() {
    let config = ExtractorConfig::new().with_ops_per_round(5_000);
    let read = extract_read(FULL_LOG, &config).next().unwrap();
    assert_eq!((read.read_ops, read.write_ops), (5_000, 0));
    let update = extract_update(FULL_LOG, &config).next().unwrap();
    assert_eq!((update.read_ops, update.write_ops), (5_000, 5_000));
}

#[test]
fn test_extraction_is_restartable() {
    let config = ExtractorConfig::default();
    let rounds = extract(FULL_LOG, Category::Read, &config);
    let first: Vec<_> = rounds.clone().collect();
    let second: Vec<_> = rounds.collect();
    assert_eq!(first, second);
    assert_eq!(first, extract_read(FULL_LOG, &config).collect::<Vec<_>>());
}

#[test]
fn test_log_without_rounds() {
    let config = ExtractorConfig::default();
    assert!(extract_all("", &config).is_empty());
    assert!(extract_all("no headings here\njust noise\n", &config).is_empty());
}

#[test]
fn test_preparation_summary() {
    let prep = extract_preparation(FULL_LOG);
    assert_eq!(prep.total_kv_pairs, Some(300_000));
    assert_eq!(prep.total_time_seconds, Some(12));
    assert_eq!(prep.batch_commits, 3);
    assert_eq!(prep.total_commit_time_ms, Some(330.0));
    assert_eq!(prep.avg_commit_time_per_batch_ms, Some(110.0));
}

fn hundredths() -> impl Strategy<Value = f64> {
    (1u32..10_000_000).prop_map(|v| v as f64 / 100.0)
}

fn read_round(round: usize, total: f64, avg: f64, tp99: f64) -> String {
    format!(
        "=== Read Test Round {} ===\n\
         ✓ Read 100000 KV pairs in {:.2} ms\n\
         ✓ Average read latency: {:.2} μs\n\
         ✓ Tp99 read latency: {:.2} μs\n\
         ✓ Read throughput: 1000.00 ops/sec\n",
        round, total, avg, tp99
    )
}

fn update_round(read_time: f64, write_time: f64) -> String {
    format!(
        "=== Update Test Round 1 ===\n\
         ✓ Read 100000 KV pairs in {:.2} ms\n\
         ✓ Read time: {:.2} ms, Write time: {:.2} ms\n\
         ✓ Commit time: 1.00 ms\n\
         ✓ Average read latency: 1.00 μs\n\
         ✓ Average write latency: 1.00 μs\n\
         ✓ Average mixed latency: 1.00 μs\n\
         ✓ Tp99 mixed latency: 1.00 μs\n\
         ✓ Mixed throughput: 1.00 ops/sec\n",
        read_time, read_time, write_time
    )
}

fn parsed(value: f64) -> f64 {
    format!("{:.2}", value).parse().unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_every_complete_round_is_extracted(
        rounds in prop::collection::vec((hundredths(), hundredths(), hundredths()), 0..12)
    ) {
        let log: String = rounds
            .iter()
            .enumerate()
            .map(|(i, (total, avg, tp99))| read_round(i + 1, *total, *avg, *tp99))
            .collect();

        let records: Vec<_> = extract_read(&log, &ExtractorConfig::default()).collect();
        prop_assert_eq!(records.len(), rounds.len());
        for (i, (record, (total, avg, tp99))) in records.iter().zip(&rounds).enumerate() {
            prop_assert_eq!(record.round_index as usize, i + 1);
            prop_assert_eq!(record.total_time_ms, parsed(*total));
            prop_assert_eq!(record.avg_latency_us, parsed(*avg));
            prop_assert_eq!(record.tp99_latency_us, parsed(*tp99));
            prop_assert!(record.is_conforming());
        }
    }

    #[test]
    fn prop_update_total_is_read_plus_write(read_time in hundredths(), write_time in hundredths()) {
        let log = update_round(read_time, write_time);
        let record = extract_update(&log, &ExtractorConfig::default()).next().unwrap();
        let read = parsed(read_time);
        let write = parsed(write_time);
        prop_assert_eq!(record.read_time_ms, Some(read));
        prop_assert_eq!(record.write_time_ms, Some(write));
        prop_assert_eq!(record.total_time_ms, read + write);
    }

    #[test]
    fn prop_arbitrary_text_never_panics(text in ".{0,400}") {
        let records = extract_all(&text, &ExtractorConfig::default());
        prop_assert!(records.iter().all(|r| r.is_conforming()));
    }
}
