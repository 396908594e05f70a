//! Raw source rows and the measurements built from them.
//!
//! The measurement source delivers CSV rows in the shape:
//! `timestamp,point_id,point_name,area_name,parameter,value,cumulative`
//! where `timestamp` is "YYYY-MM-DD HH:MM" and `cumulative` is `1` for
//! volume meter readings and `0` (or empty) for quality measurements.
//!
//! Parsing is tolerant: a row missing its timestamp, value, or point id is
//! skipped with a warning rather than aborting the batch. Partial data
//! still produces a report.

use crate::dates;
use crate::parameter::{infer_parameter, ParameterGuess, ParameterType};
use crate::point::PointInfo;
use chrono::NaiveDateTime;
use csv::{ReaderBuilder, StringRecord};
use log::warn;
use serde::{Deserialize, Serialize};

/// Expected number of columns in a measurement source CSV row.
pub const CSV_ROW_LENGTH: usize = 7;

/// Why a source row was rejected during parsing.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum RowError {
    WrongColumnCount,
    MissingTimestamp,
    MissingPointId,
    MissingValue,
}

/// One row as fetched from the measurement source, before any
/// interpretation of the parameter label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRow {
    pub timestamp: NaiveDateTime,
    pub point_id: String,
    pub point_name: String,
    pub area_name: String,
    pub parameter_label: String,
    pub value: f64,
    pub cumulative: bool,
}

impl RawRow {
    pub fn point_info(&self) -> PointInfo {
        PointInfo::new(&self.point_id, &self.point_name, &self.area_name)
    }
}

impl TryFrom<StringRecord> for RawRow {
    type Error = RowError;

    fn try_from(record: StringRecord) -> Result<Self, Self::Error> {
        if record.len() != CSV_ROW_LENGTH {
            return Err(RowError::WrongColumnCount);
        }
        let timestamp = record
            .get(0)
            .and_then(dates::parse_timestamp)
            .ok_or(RowError::MissingTimestamp)?;
        let point_id = record.get(1).unwrap_or("").trim();
        if point_id.is_empty() {
            return Err(RowError::MissingPointId);
        }
        let value: f64 = record
            .get(5)
            .and_then(|s| s.trim().parse().ok())
            .ok_or(RowError::MissingValue)?;
        let cumulative = matches!(record.get(6).map(str::trim), Some("1") | Some("true"));
        Ok(RawRow {
            timestamp,
            point_id: point_id.to_string(),
            point_name: record.get(2).unwrap_or("").trim().to_string(),
            area_name: record.get(3).unwrap_or("").trim().to_string(),
            parameter_label: record.get(4).unwrap_or("").trim().to_string(),
            value,
            cumulative,
        })
    }
}

/// Parse a CSV body into rows, skipping malformed rows with a warning.
/// Returns the parsed rows and the number of rows skipped.
pub fn parse_rows(csv_body: &str) -> (Vec<RawRow>, usize) {
    let mut rows = Vec::new();
    let mut skipped = 0usize;
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(csv_body.as_bytes());
    for (index, result) in reader.records().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                warn!("skipping unreadable row {}: {}", index + 1, e);
                skipped += 1;
                continue;
            }
        };
        match RawRow::try_from(record) {
            Ok(row) => rows.push(row),
            Err(reason) => {
                warn!("skipping malformed row {}: {:?}", index + 1, reason);
                skipped += 1;
            }
        }
    }
    (rows, skipped)
}

/// A typed water quality measurement. Ephemeral: built from fetched rows,
/// discarded when report generation finishes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub timestamp: NaiveDateTime,
    pub point_id: String,
    pub parameter: ParameterType,
    pub value: f64,
}

impl Measurement {
    /// Build typed measurements from non-cumulative rows. Rows whose
    /// parameter cannot be resolved (even by the explicit inference
    /// fallback) are dropped with a warning; a guess never enters
    /// compliance scoring without being named `Known` first.
    pub fn from_rows(rows: &[RawRow]) -> Vec<Measurement> {
        let mut measurements = Vec::new();
        for row in rows.iter().filter(|r| !r.cumulative) {
            match infer_parameter(&row.parameter_label, row.value) {
                ParameterGuess::Known(parameter) => measurements.push(Measurement {
                    timestamp: row.timestamp,
                    point_id: row.point_id.clone(),
                    parameter,
                    value: row.value,
                }),
                ParameterGuess::Unknown => {
                    warn!(
                        "dropping measurement with unresolved parameter '{}' at {} ({})",
                        row.parameter_label, row.timestamp, row.point_id
                    );
                }
            }
        }
        measurements
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const CSV_BODY: &str = "\
timestamp,point_id,point_name,area_name,parameter,value,cumulative
2024-03-04 08:00,P01,Well 1,North,pH,7.1,0
2024-03-04 08:00,P01,Well 1,North,chlorine,1.2,0
2024-03-04 08:00,,Well 2,North,pH,7.0,0
bad-timestamp,P02,Well 2,North,pH,7.0,0
2024-03-04 06:00,P01,Well 1,North,volume,1520.5,1
2024-03-04 09:00,P02,Well 2,North,turbidity,not-a-number,0
";

    #[test]
    fn test_parse_rows_skips_malformed() {
        let (rows, skipped) = parse_rows(CSV_BODY);
        assert_eq!(rows.len(), 3);
        assert_eq!(skipped, 3); // missing point id, bad timestamp, bad value
        assert_eq!(rows[0].point_id, "P01");
        assert!(!rows[0].cumulative);
        assert!(rows[2].cumulative);
        assert_eq!(rows[2].value, 1520.5);
    }

    #[test]
    fn test_row_timestamp_parsed() {
        let (rows, _) = parse_rows(CSV_BODY);
        assert_eq!(
            rows[0].timestamp.date(),
            NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
        );
    }

    #[test]
    fn test_measurements_from_rows_excludes_cumulative() {
        let (rows, _) = parse_rows(CSV_BODY);
        let measurements = Measurement::from_rows(&rows);
        assert_eq!(measurements.len(), 2);
        assert!(measurements
            .iter()
            .all(|m| m.parameter != ParameterType::Turbidity));
    }

    #[test]
    fn test_unresolvable_parameter_dropped() {
        let body = "\
timestamp,point_id,point_name,area_name,parameter,value,cumulative
2024-03-04 08:00,P01,Well 1,North,conductivity,431.0,0
";
        let (rows, skipped) = parse_rows(body);
        assert_eq!(rows.len(), 1);
        assert_eq!(skipped, 0);
        let measurements = Measurement::from_rows(&rows);
        assert!(measurements.is_empty());
    }
}
