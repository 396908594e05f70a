//! Outorga conformance: daily consumption against the granted permit.

use serde::{Deserialize, Serialize};
use wqr_core::date_range::DateRange;
use wqr_core::point::OutorgaLimit;
use wqr_core::round2;

/// One day whose consumption exceeded the permit limit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NonConformantDay {
    pub date: chrono::NaiveDate,
    pub point_id: String,
    pub value: f64,
    pub limit: f64,
    /// max(0, (value - limit) / limit * 100), 2 decimals.
    pub exceedance_pct: f64,
}

/// Conformance verdict for one point over the period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointConformance {
    pub point_id: String,
    pub limit: Option<OutorgaLimit>,
    pub days_with_reading: usize,
    pub non_conformant_days: Vec<NonConformantDay>,
    /// Conformant days over days with a reading, percent. 100 when the
    /// point had no valid days: vacuously conformant.
    pub conformance_rate: f64,
}

/// Evaluate one point's daily consumption series against its permit.
/// A day is non-conformant iff its consumption exceeds the limit; days
/// without a reading (0.0) are not counted either way. A point without a
/// permit has nothing to violate and reports as fully conformant.
pub fn evaluate_point(
    point_id: &str,
    daily_consumption: &[f64],
    range: DateRange,
    limit: Option<&OutorgaLimit>,
) -> PointConformance {
    let days_with_reading = daily_consumption.iter().filter(|v| **v > 0.0).count();

    let non_conformant_days = match limit {
        Some(permit) => daily_consumption
            .iter()
            .enumerate()
            .filter(|(_, value)| **value > 0.0 && **value > permit.value)
            .map(|(offset, value)| NonConformantDay {
                date: range.date_at(offset),
                point_id: point_id.to_string(),
                value: *value,
                limit: permit.value,
                exceedance_pct: exceedance_pct(*value, permit.value),
            })
            .collect(),
        None => Vec::new(),
    };

    let conformance_rate = if days_with_reading == 0 {
        100.0
    } else {
        let conformant = days_with_reading - non_conformant_days.len();
        round2(conformant as f64 / days_with_reading as f64 * 100.0)
    };

    PointConformance {
        point_id: point_id.to_string(),
        limit: limit.cloned(),
        days_with_reading,
        non_conformant_days,
        conformance_rate,
    }
}

/// Percentage by which `value` exceeds `limit`, floored at zero.
pub fn exceedance_pct(value: f64, limit: f64) -> f64 {
    if limit <= 0.0 {
        return 0.0;
    }
    round2(((value - limit) / limit * 100.0).max(0.0))
}

/// Merge every point's violations into one list, most recent date first.
pub fn all_non_conformities(points: &[PointConformance]) -> Vec<NonConformantDay> {
    let mut merged: Vec<NonConformantDay> = points
        .iter()
        .flat_map(|point| point.non_conformant_days.iter().cloned())
        .collect();
    merged.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.point_id.cmp(&b.point_id)));
    merged
}
