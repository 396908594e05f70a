//! Full compliance report generation.

use crate::sources::{CsvMeasurementSource, CsvPermitSource, MeasurementSource, PermitSource};
use anyhow::Context;
use log::{info, warn};
use std::collections::BTreeMap;
use wqr_core::date_range::DateRange;
use wqr_core::dates;
use wqr_core::error::ReportError;
use wqr_core::point::ClientInfo;
use wqr_report::export::{ExportDocument, InteractiveCapture};
use wqr_report::interactive::InteractiveReport;
use wqr_report::model::{ReportInputs, ReportModel};
use wqr_report::view_state::ReportViewState;

pub struct ReportArgs {
    pub measurements_csv: String,
    pub permits_csv: Option<String>,
    pub client_name: String,
    pub client_address: String,
    pub client_tax_id: String,
    pub start: String,
    pub end: String,
    pub out: String,
}

/// Generate the report HTML for the period and write it to disk.
///
/// An empty period is not a failure of the pipeline: it produces a clear
/// message instead of a report, distinct from a source that could not be
/// read at all.
pub fn run_report(args: &ReportArgs) -> anyhow::Result<()> {
    let range = parse_range(&args.start, &args.end)?;

    let source = CsvMeasurementSource {
        path: args.measurements_csv.clone(),
    };
    let (rows, skipped) = source.fetch_rows()?;
    if skipped > 0 {
        warn!("{skipped} malformed row(s) skipped in {}", args.measurements_csv);
    }

    let permits = match &args.permits_csv {
        Some(path) => CsvPermitSource { path: path.clone() }.fetch_permits()?,
        None => BTreeMap::new(),
    };

    let rows_in_period: Vec<_> = rows
        .into_iter()
        .filter(|row| range.contains(row.timestamp.date()))
        .collect();

    info!(
        "Building report for {} to {}: {} rows, {} permits",
        args.start,
        args.end,
        rows_in_period.len(),
        permits.len()
    );

    let inputs = ReportInputs {
        client: ClientInfo {
            name: args.client_name.clone(),
            address: args.client_address.clone(),
            tax_id: args.client_tax_id.clone(),
        },
        range,
        rows: rows_in_period,
        permits,
    };

    let model = match ReportModel::build(inputs) {
        Ok(model) => model,
        Err(ReportError::EmptyPeriod) => {
            // An empty period still produces an output file, with the
            // user-facing message instead of a report.
            std::fs::write(&args.out, empty_period_html(&range))
                .with_context(|| format!("writing report to {}", args.out))?;
            info!("{} ({} to {}); wrote notice to {}", ReportError::EmptyPeriod, args.start, args.end, args.out);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    let view = ReportViewState::default();
    let mut surface = InteractiveReport::new(&model, view.clone());
    let mut capture = InteractiveCapture::new(&mut surface);
    let document = ExportDocument::assemble(&model, &view, &mut capture);

    for key in &document.placeholders {
        warn!("chart {key} exported as a placeholder");
    }

    std::fs::write(&args.out, document.html())
        .with_context(|| format!("writing report to {}", args.out))?;

    info!(
        "Report complete. {} pages written to {}",
        document.pages.len(),
        args.out
    );
    Ok(())
}

fn empty_period_html(range: &DateRange) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<body>\n<p>{} ({} to {})</p>\n</body>\n</html>\n",
        ReportError::EmptyPeriod,
        dates::format_date(&range.start()),
        dates::format_date(&range.end())
    )
}

pub(crate) fn parse_range(start: &str, end: &str) -> anyhow::Result<DateRange> {
    let start = dates::parse_date(start)
        .map_err(|_| anyhow::anyhow!("invalid start date '{start}', expected YYYY-MM-DD"))?;
    let end = dates::parse_date(end)
        .map_err(|_| anyhow::anyhow!("invalid end date '{end}', expected YYYY-MM-DD"))?;
    if end < start {
        anyhow::bail!("period end {} is before start {}", end, start);
    }
    Ok(DateRange(start, end))
}
