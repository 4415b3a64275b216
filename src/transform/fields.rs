//! Per-field normalizations applied to each quote row.
//!
//! Every function here is total: a value that cannot be interpreted is
//! returned unchanged (or as the documented sentinel), never an error. The
//! whole-file failure modes live in [`crate::transform::pipeline`].

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

/// Volumes below this threshold are masked as `N/A`.
pub const VOLUME_FLOOR: i64 = 100_000;

/// Shape of an input date: `MM/DD/YYYY`, month and day 1-2 digits.
static INPUT_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{1,2}/\d{1,2}/\d{4}$").unwrap());

/// Reinterpret a `MM/DD/YYYY` date as `YYYY-MM-DD`.
///
/// Values that do not match the input pattern (including real dates in
/// other layouts) pass through unchanged.
pub fn normalize_date(raw: &str) -> String {
    let candidate = raw.trim();
    if !INPUT_DATE.is_match(candidate) {
        return raw.to_string();
    }
    match NaiveDate::parse_from_str(candidate, "%m/%d/%Y") {
        Ok(date) => date.format("%Y-%m-%d").to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Mask thin trading days: integer volumes below [`VOLUME_FLOOR`] become
/// the literal `N/A`. Non-integer values pass through unchanged.
pub fn adjust_volume(raw: &str) -> String {
    match raw.trim().parse::<i64>() {
        Ok(volume) if volume < VOLUME_FLOOR => "N/A".to_string(),
        _ => raw.to_string(),
    }
}

/// Backfill a zero intraday low with the open/close midpoint.
///
/// Applies only when `low` parses to exactly 0 and both `open` and `close`
/// parse as numbers; in every other case `low` passes through unchanged.
pub fn backfill_low(low: &str, open: &str, close: &str) -> String {
    let Ok(value) = low.trim().parse::<f64>() else {
        return low.to_string();
    };
    if value != 0.0 {
        return low.to_string();
    }
    match (open.trim().parse::<f64>(), close.trim().parse::<f64>()) {
        (Ok(open), Ok(close)) => format_number((open + close) / 2.0),
        _ => low.to_string(),
    }
}

/// Percent change from open to close: `((close - open) / open) * 100`.
///
/// A zero open, or any parse failure, yields `"0"`.
pub fn pct_change(open: &str, close: &str) -> String {
    let (Ok(open), Ok(close)) = (open.trim().parse::<f64>(), close.trim().parse::<f64>()) else {
        return "0".to_string();
    };
    if open == 0.0 {
        return "0".to_string();
    }
    format_number(((close - open) / open) * 100.0)
}

/// Decimal string form of a float. Integral values keep a trailing `.0`
/// (`15.0`, not `15`); everything else uses the shortest round-trip
/// representation.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}
