//! Date parsing and formatting helpers shared across the wqr crates.

use crate::error::ReportError;
use chrono::{NaiveDate, NaiveDateTime};

/// Display format for report dates: "YYYY-MM-DD".
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Timestamp format used by measurement source rows: "YYYY-MM-DD HH:MM".
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Format a NaiveDate as "YYYY-MM-DD".
pub fn format_date(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parse a date string in "YYYY-MM-DD" format.
pub fn parse_date(s: &str) -> Result<NaiveDate, ReportError> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|e| ReportError::DataFetch(format!("bad date '{s}': {e}")))
}

/// Parse a timestamp in "YYYY-MM-DD HH:MM" format, falling back to a bare
/// date (midnight) when the source omits the time of day.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let trimmed = s.trim();
    if let Ok(ts) = NaiveDateTime::parse_from_str(trimmed, TIMESTAMP_FORMAT) {
        return Some(ts);
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
