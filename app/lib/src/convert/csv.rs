//! CSV export and import of round records.
//!
//! One row per record, columns named after the canonical fields. Absent
//! values are written as [`NA`] so that "not measured" can never be confused
//! with zero or an empty cell, and [`records_from_csv`] restores them as
//! `None`.

use std::io;

use crate::error::{BenchError, Result};
use crate::record::{Category, Field, RoundRecord, FIELD_COUNT};

/// Marker written for absent fields.
pub const NA: &str = "NA";

/// Column names in canonical order.
pub fn header() -> Vec<&'static str> {
    let mut columns = vec!["category", "round_index"];
    columns.extend(Field::ALL.iter().map(|f| f.name()));
    columns
}

/// Write records as CSV to `writer`.
pub fn write_records<W: io::Write>(writer: W, records: &[RoundRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(header())?;

    for record in records {
        let mut row = Vec::with_capacity(FIELD_COUNT + 2);
        row.push(record.category.as_str().to_string());
        row.push(record.round_index.to_string());
        for field in Field::ALL {
            row.push(format_cell(record, field));
        }
        writer.write_record(&row)?;
    }

    writer.flush()?;
    Ok(())
}

/// Convert records to CSV text.
///
/// # Examples
///
/// ```
/// use benchdiff::{Category, RoundRecord};
/// use benchdiff::convert::csv::records_to_csv;
///
/// let record = RoundRecord::new(Category::Read, 1, 10.0, 1.5, 4.0);
/// let csv = records_to_csv(&[record]).unwrap();
/// assert!(csv.starts_with("category,round_index,total_time_ms,"));
/// assert!(csv.contains("read,1,10,NA"));
/// ```
pub fn records_to_csv(records: &[RoundRecord]) -> Result<String> {
    let mut buffer = Vec::new();
    write_records(&mut buffer, records)?;
    String::from_utf8(buffer).map_err(|e| BenchError::CsvParseError {
        line: 0,
        column: 0,
        message: format!("Failed to convert to UTF-8: {}", e),
    })
}

fn format_cell(record: &RoundRecord, field: Field) -> String {
    match field {
        Field::ReadOps => record.read_ops.to_string(),
        Field::WriteOps => record.write_ops.to_string(),
        _ => match record.get(field) {
            // `Display` for f64 is the shortest text that parses back exactly.
            Some(value) => value.to_string(),
            None => NA.to_string(),
        },
    }
}

/// Parse CSV text produced by [`records_to_csv`].
///
/// Columns may appear in any order but every canonical column must be
/// present. Each row must satisfy the category's presence rules.
pub fn records_from_csv(input: &str) -> Result<Vec<RoundRecord>> {
    if input.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(input.as_bytes());

    let headers = reader.headers().map_err(|e| BenchError::CsvParseError {
        line: 1,
        column: 0,
        message: format!("Failed to read headers: {}", e),
    })?;

    let mut positions = Vec::with_capacity(FIELD_COUNT + 2);
    for name in header() {
        let index = headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| BenchError::CsvParseError {
                line: 1,
                column: 0,
                message: format!("Missing column '{}'", name),
            })?;
        positions.push(index);
    }

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result.map_err(|e| BenchError::CsvParseError {
            line: e.position().map(|p| p.line() as usize).unwrap_or(0),
            column: 0,
            message: format!("Failed to parse record: {}", e),
        })?;
        let line = row.position().map(|p| p.line() as usize).unwrap_or(0);
        let cell = |i: usize| row.get(positions[i]).unwrap_or_default().trim();
        let error = |i: usize, message: String| BenchError::CsvParseError {
            line,
            column: positions[i] + 1,
            message,
        };

        let category: Category = cell(0).parse().map_err(|e| error(0, e))?;
        let round_index: u32 = match cell(1).parse() {
            Ok(index) if index > 0 => index,
            _ => return Err(error(1, format!("invalid round index '{}'", cell(1)))),
        };

        let mut values = [None; FIELD_COUNT];
        for (slot, field) in Field::ALL.iter().enumerate() {
            let text = cell(slot + 2);
            values[slot] = parse_cell(*field, text)
                .map_err(|message| error(slot + 2, message))?;
        }

        let record = build_record(category, round_index, &values).map_err(|field| {
            let slot = Field::ALL.iter().position(|f| *f == field).unwrap_or(0);
            error(slot + 2, format!("{} is required for {} rows", field, category))
        })?;
        if let Some(field) = record.violation() {
            let slot = Field::ALL.iter().position(|f| *f == field).unwrap_or(0);
            return Err(error(
                slot + 2,
                format!("{} is not valid for {} rows", field, category),
            ));
        }
        records.push(record);
    }

    Ok(records)
}

fn parse_cell(field: Field, text: &str) -> std::result::Result<Option<f64>, String> {
    if text == NA {
        return Ok(None);
    }
    if field.is_count() {
        return text
            .parse::<u64>()
            .map(|v| Some(v as f64))
            .map_err(|_| format!("invalid {} '{}'", field, text));
    }
    match text.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(Some(value)),
        _ => Err(format!("invalid {} '{}'", field, text)),
    }
}

/// Assemble a record from values in `Field::ALL` order.
///
/// Returns the first always-present field that is missing.
fn build_record(
    category: Category,
    round_index: u32,
    values: &[Option<f64>; FIELD_COUNT],
) -> std::result::Result<RoundRecord, Field> {
    let value = |field: Field| values[field as usize];
    let required = |field: Field| value(field).ok_or(field);

    let mut record = RoundRecord::new(
        category,
        round_index,
        required(Field::TotalTimeMs)?,
        required(Field::AvgLatencyUs)?,
        required(Field::Tp99LatencyUs)?,
    );
    record.commit_time_ms = value(Field::CommitTimeMs);
    record.read_time_ms = value(Field::ReadTimeMs);
    record.write_time_ms = value(Field::WriteTimeMs);
    record.avg_read_latency_us = value(Field::AvgReadLatencyUs);
    record.avg_write_latency_us = value(Field::AvgWriteLatencyUs);
    record.avg_mixed_latency_us = value(Field::AvgMixedLatencyUs);
    record.tp99_mixed_latency_us = required(Field::Tp99MixedLatencyUs)?;
    record.throughput_ops_sec = value(Field::ThroughputOpsSec);
    record.mixed_throughput_ops_sec = value(Field::MixedThroughputOpsSec);
    record.read_ops = required(Field::ReadOps)? as u64;
    record.write_ops = required(Field::WriteOps)? as u64;
    Ok(record)
}
