//! Integration tests for CSV export and re-import of extracted records.

use benchdiff::{
    extract_all, records_from_csv, records_to_csv, write_records, BenchError, Category,
    ExtractorConfig, Field, FIELD_COUNT,
};

const LOG: &str = "\
=== Read Test Round 1 ===
✓ Read 100000 KV pairs in 201.37 ms
✓ Average read latency: 2.01 μs
✓ Tp99 read latency: 7.33 μs
✓ Read throughput: 496598.30 ops/sec
=== Update Test Round 1 ===
✓ Read 100000 KV pairs in 300.10 ms
✓ Read time: 300.10 ms, Write time: 0.10 ms
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
fn test_extracted_records_round_trip() {
    let records = extract_all(LOG, &ExtractorConfig::default());
    assert_eq!(records.len(), 3);

    let csv = records_to_csv(&records).unwrap();
    let parsed = records_from_csv(&csv).unwrap();
    assert_eq!(parsed, records);
}

#[test]
fn test_sum_survives_round_trip_exactly() {
    let records = extract_all(LOG, &ExtractorConfig::default());
    let update = records.iter().find(|r| r.category == Category::Update).unwrap();
    // 300.1 + 0.1 is not representable as a short decimal.
    assert_eq!(update.total_time_ms, 300.1 + 0.1);

    let parsed = records_from_csv(&records_to_csv(&records).unwrap()).unwrap();
    let update_back = parsed.iter().find(|r| r.category == Category::Update).unwrap();
    assert_eq!(update_back.total_time_ms.to_bits(), update.total_time_ms.to_bits());
}

#[test]
fn test_every_row_has_every_column() {
    let csv = records_to_csv(&extract_all(LOG, &ExtractorConfig::default())).unwrap();
    for line in csv.lines() {
        assert_eq!(line.split(',').count(), FIELD_COUNT + 2);
    }
    let header: Vec<&str> = csv.lines().next().unwrap().split(',').collect();
    assert_eq!(header[2..].to_vec(), Field::ALL.iter().map(|f| f.name()).collect::<Vec<_>>());
}

#[test]
fn test_read_rows_mark_absent_fields() {
    let csv = records_to_csv(&extract_all(LOG, &ExtractorConfig::default())).unwrap();
    let read_row = csv.lines().find(|l| l.starts_with("read,")).unwrap();
    let na_count = read_row.split(',').filter(|c| *c == "NA").count();
    // commit, write time, write latency, mixed latency, mixed throughput
    assert_eq!(na_count, 5);
}

#[test]
fn test_write_records_to_writer() {
    let records = extract_all(LOG, &ExtractorConfig::default());
    let mut buffer = Vec::new();
    write_records(&mut buffer, &records).unwrap();
    assert_eq!(String::from_utf8(buffer).unwrap(), records_to_csv(&records).unwrap());
}

#[test]
fn test_malformed_number_reports_position() {
    let csv = records_to_csv(&extract_all(LOG, &ExtractorConfig::default()))
        .unwrap()
        .replace("201.37", "2O1.37");
    match records_from_csv(&csv) {
        Err(BenchError::CsvParseError { line, column, message }) => {
            assert_eq!(line, 2);
            assert_eq!(column, 3);
            assert!(message.contains("total_time_ms"));
        }
        other => panic!("expected CsvParseError, got {:?}", other),
    }
}

#[test]
fn test_ragged_row_is_rejected() {
    let csv = records_to_csv(&extract_all(LOG, &ExtractorConfig::default())).unwrap();
    let ragged = format!("{}read,9\n", csv);
    assert!(records_from_csv(&ragged).is_err());
}
