//! The interactive surface: a navigable view over the report pages.
//!
//! Navigation is a tiny state machine: the current page lives in [1, N],
//! `next`/`previous` clamp at the edges, and the surface starts on page 1.
//! There is no terminal state; navigation is user-driven and resettable.
//!
//! Visiting a page renders its charts and registers the SVG snapshots in
//! the snapshot store, which is what the export surface later captures
//! from.

use crate::chart::line_chart_svg;
use crate::model::ReportModel;
use crate::render::{self, ChartSlot, RenderedPage};
use crate::view_state::ReportViewState;
use log::warn;
use std::collections::BTreeMap;

/// Chart snapshots registered by the interactive surface, keyed by the
/// chart key from `render`.
#[derive(Debug, Clone, Default)]
pub struct SnapshotStore {
    snapshots: BTreeMap<String, String>,
}

impl SnapshotStore {
    pub fn register(&mut self, key: &str, svg: String) {
        self.snapshots.insert(key.to_string(), svg);
    }

    pub fn get(&self, key: &str) -> Option<&String> {
        self.snapshots.get(key)
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

/// The navigable report surface.
pub struct InteractiveReport<'a> {
    model: &'a ReportModel,
    view: ReportViewState,
    current: usize,
    snapshots: SnapshotStore,
}

impl<'a> InteractiveReport<'a> {
    pub fn new(model: &'a ReportModel, view: ReportViewState) -> InteractiveReport<'a> {
        InteractiveReport {
            model,
            view,
            current: 1,
            snapshots: SnapshotStore::default(),
        }
    }

    pub fn page_count(&self) -> usize {
        self.model.page_count()
    }

    /// 1-based current page number.
    pub fn current_page_number(&self) -> usize {
        self.current
    }

    /// Advance one page, clamped at the last page.
    pub fn next(&mut self) {
        self.current = (self.current + 1).min(self.page_count());
    }

    /// Go back one page, clamped at page 1.
    pub fn previous(&mut self) {
        self.current = self.current.saturating_sub(1).max(1);
    }

    pub fn view(&self) -> &ReportViewState {
        &self.view
    }

    /// Toggle a parameter series; stats and charts derive from the new
    /// visibility set on the next render, nothing is mutated in place.
    pub fn set_parameter_visible(
        &mut self,
        parameter: wqr_core::parameter::ParameterType,
        visible: bool,
    ) {
        self.view.set_visible(parameter, visible);
    }

    pub fn snapshots(&self) -> &SnapshotStore {
        &self.snapshots
    }

    /// Render the current page, drawing and registering chart snapshots
    /// for every chart slot on it. A chart that fails to draw is logged
    /// and left unregistered; the page itself still renders.
    pub fn render_current(&mut self) -> RenderedPage {
        let page = render::render_page(self.model, &self.view, self.current);
        for key in page.chart_keys() {
            if self.snapshots.get(key).is_some() {
                continue;
            }
            match self.draw_chart(key) {
                Some(Ok(svg)) => self.snapshots.register(key, svg),
                Some(Err(e)) => warn!("chart {key} failed to render: {e}"),
                None => warn!("chart {key} references no known point"),
            }
        }
        page
    }

    /// The current page as an HTML fragment with charts resolved from the
    /// snapshot store.
    pub fn current_html(&mut self) -> String {
        let page = self.render_current();
        let snapshots = &self.snapshots;
        render::page_html(&page, |key| match snapshots.get(key) {
            Some(svg) => ChartSlot::Svg(svg.clone()),
            None => ChartSlot::Placeholder,
        })
    }

    fn draw_chart(&self, key: &str) -> Option<Result<String, String>> {
        if let Some(point_id) = key.strip_prefix("vol:") {
            let vp = self.model.volume_point(point_id)?;
            let series = vec![("consumption".to_string(), vp.daily_consumption.clone())];
            return Some(line_chart_svg(
                &format!("Daily consumption - {}", vp.point.name),
                self.model.range,
                &series,
            ));
        }
        if let Some(point_id) = key.strip_prefix("qual:") {
            let qp = self.model.quality_point(point_id)?;
            let series: Vec<(String, Vec<f64>)> = qp
                .series
                .iter()
                .filter(|(parameter, _)| self.view.is_visible(*parameter))
                .map(|(parameter, values)| {
                    (parameter.display_name().to_string(), values.clone())
                })
                .collect();
            return Some(line_chart_svg(
                &format!("Water quality - {}", qp.point.name),
                self.model.range,
                &series,
            ));
        }
        None
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
    use wqr_core::point::ClientInfo;

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
                row(2, "P01", "chlorine", 1.0, false),
                row(3, "P01", "turbidity", 2.0, false),
            ],
            permits: BTreeMap::new(),
        };
        ReportModel::build(inputs).unwrap()
    }

    #[test]
    fn test_navigation_starts_at_page_one() {
        let model = model();
        let surface = InteractiveReport::new(&model, ReportViewState::default());
        assert_eq!(surface.current_page_number(), 1);
    }

    #[test]
    fn test_navigation_clamps_at_both_ends() {
        let model = model();
        let mut surface = InteractiveReport::new(&model, ReportViewState::default());
        surface.previous();
        assert_eq!(surface.current_page_number(), 1);
        for _ in 0..20 {
            surface.next();
        }
        assert_eq!(surface.current_page_number(), surface.page_count());
        surface.previous();
        assert_eq!(surface.current_page_number(), surface.page_count() - 1);
    }

    #[test]
    fn test_visiting_a_page_registers_its_snapshots() {
        let model = model();
        let mut surface = InteractiveReport::new(&model, ReportViewState::default());
        assert!(surface.snapshots().is_empty());
        surface.next(); // volume grid page
        let page = surface.render_current();
        assert!(!page.chart_keys().is_empty());
        assert_eq!(surface.snapshots().len(), page.chart_keys().len());
    }

    #[test]
    fn test_current_html_embeds_rendered_charts() {
        let model = model();
        let mut surface = InteractiveReport::new(&model, ReportViewState::default());
        surface.next();
        let html = surface.current_html();
        assert!(html.contains("<svg"));
        assert!(!html.contains("chart-placeholder"));
    }

    #[test]
    fn test_hidden_parameters_are_excluded_from_quality_charts() {
        let model = model();
        let mut view = ReportViewState::default();
        view.set_visible(wqr_core::parameter::ParameterType::Chlorine, false);
        let surface = InteractiveReport::new(&model, view);
        let svg = surface
            .draw_chart("qual:P01")
            .expect("known point")
            .expect("chart renders");
        assert!(svg.contains("Turbidity"));
        assert!(!svg.contains("Chlorine"));
    }
}
