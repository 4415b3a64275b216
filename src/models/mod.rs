//! Domain models for the quoteflow transform.
//!
//! The core structure is [`Row`]: one CSV data row as a column-name →
//! string-value mapping. Column order is not kept in the row itself; the
//! ordered header list travels separately (see [`Table`]) because output
//! order must be the original input order plus the appended derived
//! columns.

use std::collections::HashMap;

// =============================================================================
// Column Names
// =============================================================================

/// Well-known column names of a daily quote file.
pub mod columns {
    /// Trading day, `MM/DD/YYYY` on input, `YYYY-MM-DD` on output.
    pub const DATE: &str = "date";
    /// Shares traded.
    pub const VOLUME: &str = "volume";
    /// Opening price.
    pub const OPEN: &str = "open";
    /// Closing price.
    pub const CLOSE: &str = "close";
    /// Intraday low.
    pub const LOW: &str = "low";
    /// Derived: percent change from open to close.
    pub const CLOSE_PCT_CHANGE: &str = "close_pct_change";
    /// Derived: processing timestamp.
    pub const CREATED_AT: &str = "created_at";

    /// Columns the transform reads; all must be present in the header.
    pub const REQUIRED: [&str; 5] = [DATE, VOLUME, OPEN, CLOSE, LOW];

    /// Columns appended to every output row, in this order.
    pub const DERIVED: [&str; 2] = [CLOSE_PCT_CHANGE, CREATED_AT];
}

// =============================================================================
// Row
// =============================================================================

/// A single CSV row as a column → value map.
///
/// Values are kept as raw strings; numeric interpretation happens at the
/// point of use so that unparseable cells can fall back to their original
/// text.
#[derive(Debug, Clone, Default)]
pub struct Row {
    values: HashMap<String, String>,
}

impl Row {
    /// Build a row from a CSV record, pairing values with `headers`.
    ///
    /// Short records read as empty strings for the missing trailing
    /// columns; values beyond the header width are dropped.
    pub fn from_record(headers: &[String], record: &csv::StringRecord) -> Self {
        let values = headers
            .iter()
            .enumerate()
            .map(|(i, header)| (header.clone(), record.get(i).unwrap_or("").to_string()))
            .collect();
        Self { values }
    }

    /// Get a cell value by column name.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.values.get(column).map(String::as_str)
    }

    /// Set or insert a cell value.
    pub fn set(&mut self, column: &str, value: impl Into<String>) {
        self.values.insert(column.to_string(), value.into());
    }

    /// Parse a cell as an integer. `None` if absent or non-numeric.
    pub fn parse_i64(&self, column: &str) -> Option<i64> {
        self.get(column)?.trim().parse().ok()
    }

    /// Parse a cell as a float. `None` if absent or non-numeric.
    pub fn parse_f64(&self, column: &str) -> Option<f64> {
        self.get(column)?.trim().parse().ok()
    }
}

// =============================================================================
// Table
// =============================================================================

/// Parsed CSV content: the ordered header list plus all data rows.
#[derive(Debug, Clone, Default)]
pub struct Table {
    /// Column names in original input order.
    pub headers: Vec<String>,
    /// Data rows, one [`Row`] per input record.
    pub rows: Vec<Row>,
}

impl Table {
    /// Output column order: input order, then the derived columns.
    pub fn output_headers(&self) -> Vec<String> {
        let mut headers = self.headers.clone();
        headers.extend(columns::DERIVED.iter().map(|c| c.to_string()));
        headers
    }
}
