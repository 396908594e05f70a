//! Compliance summary as JSON, for piping into other tools.

use crate::report::parse_range;
use crate::sources::{CsvMeasurementSource, MeasurementSource};
use log::warn;
use wqr_compliance::aggregate::ComplianceSummary;
use wqr_core::error::ReportError;
use wqr_core::measurement::{Measurement, RawRow};

pub fn run_summary(measurements_csv: &str, start: &str, end: &str) -> anyhow::Result<()> {
    let range = parse_range(start, end)?;

    let source = CsvMeasurementSource {
        path: measurements_csv.to_string(),
    };
    let (rows, skipped) = source.fetch_rows()?;
    if skipped > 0 {
        warn!("{skipped} malformed row(s) skipped in {measurements_csv}");
    }

    let rows_in_period: Vec<_> = rows
        .into_iter()
        .filter(|row| range.contains(row.timestamp.date()))
        .collect();

    match summarize_rows(&rows_in_period) {
        Ok(summary) => println!("{}", serde_json::to_string_pretty(&summary)?),
        Err(ReportError::EmptyPeriod) => println!("{}", ReportError::EmptyPeriod),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

/// Summarize the period's rows, short-circuiting a period with no quality
/// measurements into the explicit empty result. A summary is a compliance
/// verdict; absence of data must never read as 0% compliance.
fn summarize_rows(rows: &[RawRow]) -> Result<ComplianceSummary, ReportError> {
    let measurements = Measurement::from_rows(rows);
    if measurements.is_empty() {
        return Err(ReportError::EmptyPeriod);
    }
    Ok(wqr_compliance::aggregate::summarize(&measurements))
}
