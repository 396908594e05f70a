//! Data sources for the commands.
//!
//! Measurements and permits arrive as CSV exports on disk. The source
//! traits keep the commands testable without touching the filesystem;
//! an unreadable file surfaces as a fetch error, which is reported
//! separately from an empty period.

use log::warn;
use std::collections::BTreeMap;
use std::fs;
use wqr_core::error::ReportError;
use wqr_core::measurement::{self, RawRow};
use wqr_core::point::OutorgaLimit;

pub trait MeasurementSource {
    /// Fetch every raw row the source holds, plus the number of rows
    /// skipped as malformed.
    fn fetch_rows(&self) -> Result<(Vec<RawRow>, usize), ReportError>;
}

pub trait PermitSource {
    fn fetch_permits(&self) -> Result<BTreeMap<String, OutorgaLimit>, ReportError>;
}

/// Measurement rows from a CSV export on disk.
pub struct CsvMeasurementSource {
    pub path: String,
}

impl MeasurementSource for CsvMeasurementSource {
    fn fetch_rows(&self) -> Result<(Vec<RawRow>, usize), ReportError> {
        let body = fs::read_to_string(&self.path)
            .map_err(|e| ReportError::DataFetch(format!("{}: {}", self.path, e)))?;
        Ok(measurement::parse_rows(&body))
    }
}

/// Outorga permits from a `point_id,limit_m3` CSV on disk.
pub struct CsvPermitSource {
    pub path: String,
}

impl PermitSource for CsvPermitSource {
    fn fetch_permits(&self) -> Result<BTreeMap<String, OutorgaLimit>, ReportError> {
        let body = fs::read_to_string(&self.path)
            .map_err(|e| ReportError::DataFetch(format!("{}: {}", self.path, e)))?;
        Ok(parse_permits(&body))
    }
}

/// Parse the permits CSV, skipping malformed rows with a warning.
pub fn parse_permits(csv_body: &str) -> BTreeMap<String, OutorgaLimit> {
    let mut permits = BTreeMap::new();
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(csv_body.as_bytes());
    for (index, result) in reader.records().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                warn!("skipping unreadable permit row {}: {}", index + 1, e);
                continue;
            }
        };
        let point_id = record.get(0).map(str::trim).unwrap_or("");
        let limit: Option<f64> = record.get(1).and_then(|s| s.trim().parse().ok());
        match (point_id.is_empty(), limit) {
            // A permit limit is a granted daily volume; zero or negative
            // values are source errors, not grants.
            (false, Some(limit)) if limit > 0.0 => {
                permits.insert(point_id.to_string(), OutorgaLimit::cubic_meters(limit));
            }
            _ => warn!("skipping malformed permit row {}", index + 1),
        }
    }
    permits
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_permits() {
        let body = "\
point_id,limit_m3
P01,150.0
P02,not-a-number
,30.0
P03,80
";
        let permits = parse_permits(body);
        assert_eq!(permits.len(), 2);
        assert_eq!(permits["P01"].value, 150.0);
        assert_eq!(permits["P01"].unit, "m³");
        assert_eq!(permits["P03"].value, 80.0);
    }

    #[test]
    fn test_parse_permits_rejects_non_positive_limits() {
        let body = "\
point_id,limit_m3
P01,-1.0
P02,0.0
P03,12.5
";
        let permits = parse_permits(body);
        assert_eq!(permits.len(), 1);
        assert_eq!(permits["P03"].value, 12.5);
    }

    #[test]
    fn test_missing_file_is_a_fetch_error() {
        let source = CsvMeasurementSource {
            path: "/nonexistent/measurements.csv".to_string(),
        };
        let err = source.fetch_rows().unwrap_err();
        assert!(matches!(err, ReportError::DataFetch(_)));
    }
}
