//! The report model: everything a rendering surface needs, computed once.
//!
//! Built in a single pass from fetched rows and permits; never mutated
//! afterwards. Identical inputs produce identical page counts and per-page
//! point ordering. Every struct here is `Serialize` so the page tree can be
//! handed to an external renderer or transport as JSON.

use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::BTreeMap;
use wqr_compliance::aggregate::{self, ComplianceSummary};
use wqr_compliance::outorga::{self, NonConformantDay, PointConformance};
use wqr_core::date_range::DateRange;
use wqr_core::error::ReportError;
use wqr_core::measurement::{Measurement, RawRow};
use wqr_core::parameter::{ParameterType, ALL_PARAMETERS};
use wqr_core::point::{ClientInfo, OutorgaLimit, PointInfo};
use wqr_data::normalize::normalize_daily;
use wqr_data::volume::{consumption_series, total_consumption};

/// What a single page holds. Assignment is computed by `paginate` and
/// stored on the model so both surfaces read the same list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PageContent {
    Summary,
    VolumeGrid { point_ids: Vec<String> },
    QualityGrid { point_ids: Vec<String> },
    MeasurementTable,
}

/// One point's volume story: daily consumption, period total, and the
/// outorga conformance verdict.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolumePoint {
    pub point: PointInfo,
    pub daily_consumption: Vec<f64>,
    pub total_consumption: f64,
    pub conformance: PointConformance,
}

/// One point's quality story: a gap-free daily series per parameter that
/// was measured there, in fixed parameter order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityPoint {
    pub point: PointInfo,
    pub series: Vec<(ParameterType, Vec<f64>)>,
}

/// Everything the report generation consumed, already fetched.
#[derive(Debug, Clone)]
pub struct ReportInputs {
    pub client: ClientInfo,
    pub range: DateRange,
    pub rows: Vec<RawRow>,
    pub permits: BTreeMap<String, OutorgaLimit>,
}

/// The complete report: statistics, per-point series, and the page list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportModel {
    pub client: ClientInfo,
    pub range: DateRange,
    pub summary: ComplianceSummary,
    pub volume_points: Vec<VolumePoint>,
    pub quality_points: Vec<QualityPoint>,
    /// Permit violations across all points, most recent first.
    pub non_conformities: Vec<NonConformantDay>,
    pub pages: Vec<PageContent>,
}

impl ReportModel {
    /// Run the pure pipeline: normalize, classify, aggregate, evaluate,
    /// paginate. An upstream fetch that produced no rows at all
    /// short-circuits into the explicit empty-period result; no partial
    /// report is emitted.
    pub fn build(inputs: ReportInputs) -> Result<ReportModel, ReportError> {
        if inputs.rows.is_empty() {
            return Err(ReportError::EmptyPeriod);
        }

        let points = point_directory(&inputs.rows);
        let measurements = Measurement::from_rows(&inputs.rows);
        let summary = aggregate::summarize(&measurements);

        let volume_points = build_volume_points(&inputs, &points);
        let quality_points = build_quality_points(&inputs, &points, &measurements);

        let conformances: Vec<PointConformance> = volume_points
            .iter()
            .map(|vp| vp.conformance.clone())
            .collect();
        let non_conformities = outorga::all_non_conformities(&conformances);

        let has_table = !non_conformities.is_empty()
            || summary.parameter_stats.iter().any(|s| !s.events.is_empty());
        let volume_ids: Vec<String> = volume_points
            .iter()
            .map(|vp| vp.point.point_id.clone())
            .collect();
        let quality_ids: Vec<String> = quality_points
            .iter()
            .map(|qp| qp.point.point_id.clone())
            .collect();
        let pages = crate::paginate::page_contents(&volume_ids, &quality_ids, has_table);

        Ok(ReportModel {
            client: inputs.client,
            range: inputs.range,
            summary,
            volume_points,
            quality_points,
            non_conformities,
            pages,
        })
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn volume_point(&self, point_id: &str) -> Option<&VolumePoint> {
        self.volume_points
            .iter()
            .find(|vp| vp.point.point_id == point_id)
    }

    pub fn quality_point(&self, point_id: &str) -> Option<&QualityPoint> {
        self.quality_points
            .iter()
            .find(|qp| qp.point.point_id == point_id)
    }

    /// Quality non-compliance events across all parameters, most recent
    /// first, for the measurement table page.
    pub fn quality_events(&self) -> Vec<&wqr_compliance::aggregate::NonComplianceEvent> {
        let mut events: Vec<_> = self
            .summary
            .parameter_stats
            .iter()
            .flat_map(|stats| stats.events.iter())
            .collect();
        events.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        events
    }
}

/// First-seen display metadata per point id, ordered by point id.
fn point_directory(rows: &[RawRow]) -> BTreeMap<String, PointInfo> {
    let mut directory = BTreeMap::new();
    for row in rows {
        directory
            .entry(row.point_id.clone())
            .or_insert_with(|| row.point_info());
    }
    directory
}

fn build_volume_points(
    inputs: &ReportInputs,
    points: &BTreeMap<String, PointInfo>,
) -> Vec<VolumePoint> {
    // Group cumulative readings per point; BTreeMap keeps point order
    // stable across runs.
    let mut readings: BTreeMap<String, Vec<(NaiveDateTime, f64)>> = BTreeMap::new();
    for row in inputs.rows.iter().filter(|r| r.cumulative) {
        readings
            .entry(row.point_id.clone())
            .or_default()
            .push((row.timestamp, row.value));
    }

    readings
        .into_iter()
        .map(|(point_id, point_readings)| {
            let cumulative = normalize_daily(&point_readings, inputs.range);
            let daily = consumption_series(&cumulative, inputs.range);
            let conformance = outorga::evaluate_point(
                &point_id,
                &daily,
                inputs.range,
                inputs.permits.get(&point_id),
            );
            let point = points
                .get(&point_id)
                .cloned()
                .unwrap_or_else(|| PointInfo::new(&point_id, &point_id, ""));
            VolumePoint {
                point,
                total_consumption: total_consumption(&cumulative),
                daily_consumption: daily,
                conformance,
            }
        })
        .collect()
}

fn build_quality_points(
    inputs: &ReportInputs,
    points: &BTreeMap<String, PointInfo>,
    measurements: &[Measurement],
) -> Vec<QualityPoint> {
    let mut by_point: BTreeMap<String, Vec<&Measurement>> = BTreeMap::new();
    for measurement in measurements {
        by_point
            .entry(measurement.point_id.clone())
            .or_default()
            .push(measurement);
    }

    by_point
        .into_iter()
        .map(|(point_id, point_measurements)| {
            let series = ALL_PARAMETERS
                .iter()
                .filter_map(|parameter| {
                    let readings: Vec<(NaiveDateTime, f64)> = point_measurements
                        .iter()
                        .filter(|m| m.parameter == *parameter)
                        .map(|m| (m.timestamp, m.value))
                        .collect();
                    if readings.is_empty() {
                        return None;
                    }
                    Some((*parameter, normalize_daily(&readings, inputs.range)))
                })
                .collect();
            let point = points
                .get(&point_id)
                .cloned()
                .unwrap_or_else(|| PointInfo::new(&point_id, &point_id, ""));
            QualityPoint { point, series }
        })
        .collect()
}
