//! Row transformation pipeline.
//!
//! The contract: CSV text in, CSV text out. Each data row keeps its
//! original columns (in order), with `date`, `volume` and `low` rewritten
//! per the field rules, and `close_pct_change` + `created_at` appended.
//! Row count is preserved; a row is never dropped because of a malformed
//! field.
//!
//! Whole-file problems (empty payload, missing required column, structural
//! CSV errors) abort with a [`CsvError`]; everything transformed is built
//! in memory, so nothing partial ever leaves this module.

use chrono::Utc;
use csv::ReaderBuilder;

use super::fields;
use crate::error::{CsvError, CsvResult};
use crate::models::{columns, Row, Table};

/// `created_at` stamp layout: UTC, RFC 3339, seconds precision.
pub const CREATED_AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Output of a successful transformation.
#[derive(Debug, Clone)]
pub struct Transformed {
    /// The serialized output CSV, header included.
    pub csv: String,
    /// Number of data rows (equals the input row count).
    pub row_count: usize,
    /// Output column order.
    pub columns: Vec<String>,
}

/// Transform a CSV payload, stamping rows with the current time.
pub fn transform_csv(input: &str) -> CsvResult<Transformed> {
    let created_at = Utc::now().format(CREATED_AT_FORMAT).to_string();
    transform_csv_at(input, &created_at)
}

/// Transform a CSV payload with an explicit `created_at` stamp.
///
/// The stamp is applied to every row, so one invocation produces one
/// uniform timestamp. Split out from [`transform_csv`] for deterministic
/// tests.
pub fn transform_csv_at(input: &str, created_at: &str) -> CsvResult<Transformed> {
    let table = parse(input)?;
    let output_headers = table.output_headers();

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&output_headers)?;

    let mut row_count = 0;
    for mut row in table.rows {
        transform_row(&mut row, created_at);
        let record: Vec<&str> = output_headers
            .iter()
            .map(|column| row.get(column).unwrap_or(""))
            .collect();
        writer.write_record(&record)?;
        row_count += 1;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| CsvError::Output(e.to_string()))?;
    let csv = String::from_utf8(bytes)?;

    Ok(Transformed {
        csv,
        row_count,
        columns: output_headers,
    })
}

/// Parse CSV text into a [`Table`], validating the header.
///
/// The reader is flexible: short rows read as empty trailing cells, long
/// rows are truncated to the header width. Structural errors inside a
/// record still abort the whole file.
pub fn parse(input: &str) -> CsvResult<Table> {
    if input.trim().is_empty() {
        return Err(CsvError::EmptyFile);
    }

    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_reader(input.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
    for required in columns::REQUIRED {
        if !headers.iter().any(|h| h == required) {
            return Err(CsvError::MissingColumn(required.to_string()));
        }
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        rows.push(Row::from_record(&headers, &record?));
    }

    Ok(Table { headers, rows })
}

/// Apply the field rules to one row, in their fixed order.
///
/// `close_pct_change` reads the untouched `open`/`close` cells; only
/// `date`, `volume` and `low` are ever rewritten in place.
pub fn transform_row(row: &mut Row, created_at: &str) {
    let date = row.get(columns::DATE).unwrap_or("").to_string();
    row.set(columns::DATE, fields::normalize_date(&date));

    let volume = row.get(columns::VOLUME).unwrap_or("").to_string();
    row.set(columns::VOLUME, fields::adjust_volume(&volume));

    let open = row.get(columns::OPEN).unwrap_or("").to_string();
    let close = row.get(columns::CLOSE).unwrap_or("").to_string();

    let low = row.get(columns::LOW).unwrap_or("").to_string();
    row.set(columns::LOW, fields::backfill_low(&low, &open, &close));

    row.set(columns::CLOSE_PCT_CHANGE, fields::pct_change(&open, &close));
    row.set(columns::CREATED_AT, created_at);
}

#[cfg(test)]
mod tests {
    use super::*;

    const STAMP: &str = "2024-06-01T00:00:00Z";

    const INPUT: &str = "\
date,ticker,volume,open,close,low
03/15/2024,ACME,50000,100,110,95
03/16/2024,ACME,150000,110,99,0
not-a-date,ACME,abc,0,5,n/a
";

    fn lines(csv: &str) -> Vec<&str> {
        csv.lines().collect()
    }

    #[test]
    fn test_header_gains_derived_columns() {
        let out = transform_csv_at(INPUT, STAMP).unwrap();
        assert_eq!(
            lines(&out.csv)[0],
            "date,ticker,volume,open,close,low,close_pct_change,created_at"
        );
        assert_eq!(out.columns.len(), 8);
    }

    #[test]
    fn test_row_count_preserved() {
        let out = transform_csv_at(INPUT, STAMP).unwrap();
        assert_eq!(out.row_count, 3);
        assert_eq!(lines(&out.csv).len(), 4);
    }

    #[test]
    fn test_well_formed_row() {
        let out = transform_csv_at(INPUT, STAMP).unwrap();
        // volume below the floor masked, date reformatted, pct appended
        assert_eq!(
            lines(&out.csv)[1],
            "2024-03-15,ACME,N/A,100,110,95,10.0,2024-06-01T00:00:00Z"
        );
    }

    #[test]
    fn test_zero_low_backfilled() {
        let out = transform_csv_at(INPUT, STAMP).unwrap();
        // (110 + 99) / 2 = 104.5; pct change (99-110)/110*100 = -10.0
        assert_eq!(
            lines(&out.csv)[2],
            "2024-03-16,ACME,150000,110,99,104.5,-10.0,2024-06-01T00:00:00Z"
        );
    }

    #[test]
    fn test_malformed_fields_degrade_not_drop() {
        let out = transform_csv_at(INPUT, STAMP).unwrap();
        // date and volume unchanged, zero open pins pct to 0, low untouched
        assert_eq!(
            lines(&out.csv)[3],
            "not-a-date,ACME,abc,0,5,n/a,0,2024-06-01T00:00:00Z"
        );
    }

    #[test]
    fn test_passthrough_columns_keep_position() {
        let input = "ticker,date,volume,open,close,low,note\n\
                     ACME,03/15/2024,200000,10,20,5,hello\n";
        let out = transform_csv_at(input, STAMP).unwrap();
        assert_eq!(
            lines(&out.csv)[0],
            "ticker,date,volume,open,close,low,note,close_pct_change,created_at"
        );
        assert_eq!(
            lines(&out.csv)[1],
            "ACME,2024-03-15,200000,10,20,5,hello,100.0,2024-06-01T00:00:00Z"
        );
    }

    #[test]
    fn test_quoted_values_survive() {
        let input = "date,volume,open,close,low,name\n\
                     03/15/2024,200000,10,20,5,\"Acme, Inc.\"\n";
        let out = transform_csv_at(input, STAMP).unwrap();
        assert!(out.csv.contains("\"Acme, Inc.\""));
    }

    #[test]
    fn test_short_row_reads_as_empty_cells() {
        let input = "date,volume,open,close,low\n03/15/2024,200000\n";
        let out = transform_csv_at(input, STAMP).unwrap();
        // open/close/low empty: pct falls back to 0, low stays empty
        assert_eq!(
            lines(&out.csv)[1],
            "2024-03-15,200000,,,,0,2024-06-01T00:00:00Z"
        );
    }

    #[test]
    fn test_empty_payload_rejected() {
        assert!(matches!(transform_csv_at("", STAMP), Err(CsvError::EmptyFile)));
        assert!(matches!(
            transform_csv_at("  \n ", STAMP),
            Err(CsvError::EmptyFile)
        ));
    }

    #[test]
    fn test_missing_required_column_rejected() {
        let input = "date,volume,open,close\n03/15/2024,1,2,3\n";
        match transform_csv_at(input, STAMP) {
            Err(CsvError::MissingColumn(column)) => assert_eq!(column, "low"),
            other => panic!("expected MissingColumn, got {:?}", other.map(|t| t.csv)),
        }
    }

    #[test]
    fn test_header_only_is_valid() {
        let input = "date,volume,open,close,low\n";
        let out = transform_csv_at(input, STAMP).unwrap();
        assert_eq!(out.row_count, 0);
        assert_eq!(lines(&out.csv).len(), 1);
    }

    #[test]
    fn test_wall_clock_stamp_matches_format() {
        let input = "date,volume,open,close,low\n03/15/2024,1,2,3,4\n";
        let out = transform_csv(input).unwrap();
        let stamp = lines(&out.csv)[1].rsplit(',').next().unwrap();
        assert!(chrono::NaiveDateTime::parse_from_str(stamp, CREATED_AT_FORMAT).is_ok());
    }
}
