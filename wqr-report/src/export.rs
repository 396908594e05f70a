//! The export surface: assemble every page into one document.
//!
//! Charts are not drawn here. The export captures the snapshots the
//! interactive surface registered; a snapshot that never materializes
//! within the capture budget degrades to an explicit placeholder in the
//! output instead of failing the export or silently dropping the chart.

use crate::interactive::InteractiveReport;
use crate::model::ReportModel;
use crate::render::{self, ChartSlot};
use crate::view_state::ReportViewState;
use log::warn;
use std::fmt;

/// A chart snapshot did not appear within the capture budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureTimeout {
    pub key: String,
}

impl fmt::Display for CaptureTimeout {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "snapshot for chart {} did not stabilize", self.key)
    }
}

impl std::error::Error for CaptureTimeout {}

/// Source of chart snapshots for the export surface.
pub trait ChartCapture {
    fn capture(&mut self, key: &str) -> Result<String, CaptureTimeout>;
}

/// Captures snapshots by driving an interactive surface page by page
/// until the requested snapshot is registered, with a bounded number of
/// visits.
pub struct InteractiveCapture<'a, 'm> {
    surface: &'a mut InteractiveReport<'m>,
    max_attempts: usize,
}

impl<'a, 'm> InteractiveCapture<'a, 'm> {
    pub fn new(surface: &'a mut InteractiveReport<'m>) -> InteractiveCapture<'a, 'm> {
        InteractiveCapture {
            surface,
            max_attempts: 3,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> InteractiveCapture<'a, 'm> {
        self.max_attempts = max_attempts.max(1);
        self
    }
}

impl ChartCapture for InteractiveCapture<'_, '_> {
    fn capture(&mut self, key: &str) -> Result<String, CaptureTimeout> {
        for _ in 0..self.max_attempts {
            if let Some(svg) = self.surface.snapshots().get(key) {
                return Ok(svg.clone());
            }
            // Rendering the page that owns the chart registers its
            // snapshot as a side effect.
            self.surface.render_current();
            if let Some(svg) = self.surface.snapshots().get(key) {
                return Ok(svg.clone());
            }
            self.surface.next();
        }
        Err(CaptureTimeout {
            key: key.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportedPage {
    pub number: usize,
    pub title: String,
    pub html: String,
}

/// The assembled report document.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportDocument {
    pub pages: Vec<ExportedPage>,
    /// Chart keys that degraded to placeholders.
    pub placeholders: Vec<String>,
}

impl ExportDocument {
    /// Visit every page in order and assemble the full document. Capture
    /// failures degrade that one chart to a placeholder; the export as a
    /// whole always succeeds.
    pub fn assemble(
        model: &ReportModel,
        view: &ReportViewState,
        capture: &mut dyn ChartCapture,
    ) -> ExportDocument {
        let mut pages = Vec::with_capacity(model.page_count());
        let mut placeholders = Vec::new();
        for number in 1..=model.page_count() {
            let page = render::render_page(model, view, number);
            let html = render::page_html(&page, |key| match capture.capture(key) {
                Ok(svg) => ChartSlot::Svg(svg),
                Err(timeout) => {
                    warn!("export degraded to placeholder: {timeout}");
                    placeholders.push(timeout.key);
                    ChartSlot::Placeholder
                }
            });
            pages.push(ExportedPage {
                number,
                title: page.title.clone(),
                html,
            });
        }
        ExportDocument {
            pages,
            placeholders,
        }
    }

    /// The whole report as a standalone HTML document.
    pub fn html(&self) -> String {
        let mut html = String::from(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
             <title>Compliance report</title>\n</head>\n<body>\n",
        );
        for page in &self.pages {
            html.push_str(&page.html);
        }
        html.push_str("</body>\n</html>\n");
        html
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ReportInputs, ReportModel};
    use chrono::NaiveDate;
    use std::collections::BTreeMap;
    use wqr_core::date_range::DateRange;
    use wqr_core::measurement::RawRow;
    use wqr_core::point::{ClientInfo, OutorgaLimit};

    fn row(day: u32, point: &str, parameter: &str, value: f64, cumulative: bool) -> RawRow {
        RawRow {
            timestamp: NaiveDate::from_ymd_opt(2024, 3, day)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap(),
            point_id: point.to_string(),
            point_name: format!("Point {point}"),
            area_name: "North".to_string(),
            parameter_label: parameter.to_string(),
            value,
            cumulative,
        }
    }

    fn model() -> ReportModel {
        let mut permits = BTreeMap::new();
        permits.insert("P01".to_string(), OutorgaLimit::cubic_meters(50.0));
        let inputs = ReportInputs {
            client: ClientInfo::default(),
            range: DateRange(
                NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 3, 7).unwrap(),
            ),
            rows: vec![
                row(1, "P01", "volume", 100.0, true),
                row(2, "P01", "volume", 130.0, true),
                row(1, "P01", "pH", 7.0, false),
                row(2, "P01", "pH", 4.0, false),
                row(3, "P01", "chlorine", 1.0, false),
            ],
            permits,
        };
        ReportModel::build(inputs).unwrap()
    }

    struct NeverCapture;

    impl ChartCapture for NeverCapture {
        fn capture(&mut self, key: &str) -> Result<String, CaptureTimeout> {
            Err(CaptureTimeout {
                key: key.to_string(),
            })
        }
    }

    #[test]
    fn test_export_covers_every_page_in_order() {
        let model = model();
        let view = ReportViewState::default();
        let mut surface = InteractiveReport::new(&model, view.clone());
        let mut capture = InteractiveCapture::new(&mut surface);
        let doc = ExportDocument::assemble(&model, &view, &mut capture);
        assert_eq!(doc.pages.len(), model.page_count());
        let numbers: Vec<usize> = doc.pages.iter().map(|p| p.number).collect();
        assert_eq!(numbers, (1..=model.page_count()).collect::<Vec<_>>());
    }

    #[test]
    fn test_interactive_capture_resolves_every_chart() {
        let model = model();
        let view = ReportViewState::default();
        let mut surface = InteractiveReport::new(&model, view.clone());
        let mut capture = InteractiveCapture::new(&mut surface);
        let doc = ExportDocument::assemble(&model, &view, &mut capture);
        assert!(doc.placeholders.is_empty());
        assert!(doc.html().contains("<svg"));
    }

    #[test]
    fn test_capture_timeout_degrades_to_placeholder() {
        let model = model();
        let view = ReportViewState::default();
        let doc = ExportDocument::assemble(&model, &view, &mut NeverCapture);
        assert_eq!(doc.pages.len(), model.page_count());
        assert!(!doc.placeholders.is_empty());
        assert!(doc.html().contains("chart-placeholder"));
    }

    #[test]
    fn test_export_matches_interactive_page_content() {
        let model = model();
        let view = ReportViewState::default();
        let mut surface = InteractiveReport::new(&model, view.clone());
        let mut capture = InteractiveCapture::new(&mut surface);
        let doc = ExportDocument::assemble(&model, &view, &mut capture);

        let mut walker = InteractiveReport::new(&model, view);
        for page in &doc.pages {
            while walker.current_page_number() < page.number {
                walker.next();
            }
            assert_eq!(walker.current_html(), page.html);
        }
    }
}
