//! Report-wide rollup of sample and parameter classifications.

use crate::classify::{classify, RiskTier};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use wqr_core::measurement::Measurement;
use wqr_core::parameter::{ComplianceBand, ParameterType, ALL_PARAMETERS};
use wqr_core::round2;
use wqr_core::sample::Sample;

/// One measurement that violated its band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NonComplianceEvent {
    pub timestamp: NaiveDateTime,
    pub point_id: String,
    pub parameter: ParameterType,
    pub value: f64,
    pub deviation_pct: f64,
    pub risk: RiskTier,
}

/// Rollup for one parameter across the whole report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterStats {
    pub parameter: ParameterType,
    pub total_measurements: usize,
    pub compliant_measurements: usize,
    pub compliance_rate: f64,
    /// Mean over every raw value, compliant or not.
    pub average_value: f64,
    /// Chronologically descending: most recent violation first.
    pub events: Vec<NonComplianceEvent>,
}

impl ParameterStats {
    pub fn high_risk_count(&self) -> usize {
        self.events
            .iter()
            .filter(|event| event.risk == RiskTier::High)
            .count()
    }
}

/// The standalone compliance summary: usable on its own (dashboards)
/// independent of pagination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceSummary {
    pub total_samples: usize,
    pub compliant_samples: usize,
    pub compliance_rate: f64,
    pub parameter_stats: Vec<ParameterStats>,
    pub recommendations: Vec<String>,
}

/// 100 × part / whole, exactly 0.0 when the whole is 0, clamped to
/// [0, 100]. Never a division fault.
pub fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    round2((part as f64 / whole as f64 * 100.0).clamp(0.0, 100.0))
}

/// Aggregate measurements into the report-wide compliance summary.
///
/// Sample-level figures come from the (point, timestamp) bundles;
/// parameter-level figures count every measurement individually.
pub fn summarize(measurements: &[Measurement]) -> ComplianceSummary {
    let samples = Sample::build_samples(measurements);
    let total_samples = samples.len();
    let compliant_samples = samples.iter().filter(|s| s.overall_compliant).count();

    let parameter_stats: Vec<ParameterStats> = ALL_PARAMETERS
        .iter()
        .map(|parameter| stats_for_parameter(*parameter, measurements))
        .collect();

    let compliance_rate = percentage(compliant_samples, total_samples);
    let recommendations = recommend(compliance_rate, &parameter_stats);

    ComplianceSummary {
        total_samples,
        compliant_samples,
        compliance_rate,
        parameter_stats,
        recommendations,
    }
}

fn stats_for_parameter(parameter: ParameterType, measurements: &[Measurement]) -> ParameterStats {
    let band = ComplianceBand::for_parameter(parameter);
    let mut total = 0usize;
    let mut compliant = 0usize;
    let mut value_sum = 0.0f64;
    let mut events = Vec::new();

    for measurement in measurements.iter().filter(|m| m.parameter == parameter) {
        total += 1;
        value_sum += measurement.value;
        let verdict = classify(measurement.value, &band);
        if verdict.compliant {
            compliant += 1;
        } else if let Some(risk) = verdict.risk {
            events.push(NonComplianceEvent {
                timestamp: measurement.timestamp,
                point_id: measurement.point_id.clone(),
                parameter,
                value: measurement.value,
                deviation_pct: verdict.deviation_pct,
                risk,
            });
        }
    }

    // Most recent violation first.
    events.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    ParameterStats {
        parameter,
        total_measurements: total,
        compliant_measurements: compliant,
        compliance_rate: percentage(compliant, total),
        average_value: if total == 0 {
            0.0
        } else {
            round2(value_sum / total as f64)
        },
        events,
    }
}

/// Deterministic recommendation rules, evaluated in order:
/// 1. a parameter with any high-risk event gets a parameter-specific alert;
/// 2. an overall compliance rate under 90% gets a general review;
/// 3. nothing fired: a single all-clear message.
/// Recommendations are never produced any other way.
pub fn recommend(compliance_rate: f64, parameter_stats: &[ParameterStats]) -> Vec<String> {
    let mut recommendations = Vec::new();

    for stats in parameter_stats {
        let high_risk = stats.high_risk_count();
        if high_risk > 0 {
            recommendations.push(format!(
                "{} recorded {} high-risk deviation(s); inspect treatment at the affected points immediately.",
                stats.parameter.display_name(),
                high_risk
            ));
        }
    }

    if compliance_rate < 90.0 {
        recommendations.push(format!(
            "Overall compliance rate is {compliance_rate:.2}%; schedule a general review of collection and treatment procedures."
        ));
    }

    if recommendations.is_empty() {
        recommendations.push("All parameters within regulatory limits for the period.".to_string());
    }

    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn measurement(
        day: u32,
        point: &str,
        parameter: ParameterType,
        value: f64,
    ) -> Measurement {
        Measurement {
            timestamp: NaiveDate::from_ymd_opt(2024, 3, day)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap(),
            point_id: point.to_string(),
            parameter,
            value,
        }
    }

    #[test]
    fn test_percentage_zero_total_is_zero() {
        assert_eq!(percentage(0, 0), 0.0);
        assert_eq!(percentage(5, 0), 0.0);
    }

    #[test]
    fn test_percentage_clamped_and_rounded() {
        assert_eq!(percentage(1, 3), 33.33);
        assert_eq!(percentage(3, 3), 100.0);
    }

    #[test]
    fn test_summarize_counts_samples_and_measurements() {
        let measurements = vec![
            measurement(1, "P01", ParameterType::Ph, 7.0),
            measurement(1, "P01", ParameterType::Chlorine, 1.0),
            measurement(2, "P01", ParameterType::Ph, 4.0), // 20% below min
            measurement(3, "P02", ParameterType::Turbidity, 2.0),
        ];
        let summary = summarize(&measurements);
        assert_eq!(summary.total_samples, 3);
        assert_eq!(summary.compliant_samples, 2);
        assert_eq!(summary.compliance_rate, 66.67);

        let ph = &summary.parameter_stats[0];
        assert_eq!(ph.parameter, ParameterType::Ph);
        assert_eq!(ph.total_measurements, 2);
        assert_eq!(ph.compliant_measurements, 1);
        assert_eq!(ph.compliance_rate, 50.0);
        // average includes the non-compliant value: (7.0 + 4.0) / 2
        assert_eq!(ph.average_value, 5.5);
        assert_eq!(ph.events.len(), 1);
        assert_eq!(ph.events[0].deviation_pct, 20.0);
        assert_eq!(ph.events[0].risk, RiskTier::Medium);
    }

    #[test]
    fn test_summarize_empty_is_all_zero_without_fault() {
        let summary = summarize(&[]);
        assert_eq!(summary.total_samples, 0);
        assert_eq!(summary.compliance_rate, 0.0);
        assert!(summary
            .parameter_stats
            .iter()
            .all(|stats| stats.compliance_rate == 0.0 && stats.average_value == 0.0));
    }

    #[test]
    fn test_events_sorted_most_recent_first() {
        let measurements = vec![
            measurement(1, "P01", ParameterType::Chlorine, 8.0),
            measurement(9, "P01", ParameterType::Chlorine, 7.0),
            measurement(5, "P02", ParameterType::Chlorine, 9.0),
        ];
        let summary = summarize(&measurements);
        let chlorine = &summary.parameter_stats[1];
        let days: Vec<u32> = chlorine
            .events
            .iter()
            .map(|e| chrono::Datelike::day(&e.timestamp.date()))
            .collect();
        assert_eq!(days, vec![9, 5, 1]);
    }

    #[test]
    fn test_recommend_high_risk_parameter_alert() {
        let measurements = vec![
            measurement(1, "P01", ParameterType::Turbidity, 20.0), // 300% over
            measurement(2, "P01", ParameterType::Ph, 7.0),
        ];
        let summary = summarize(&measurements);
        assert!(summary.recommendations[0].contains("Turbidity"));
        assert!(summary.recommendations[0].contains("high-risk"));
    }

    #[test]
    fn test_recommend_general_review_below_90() {
        let measurements = vec![
            measurement(1, "P01", ParameterType::Ph, 7.0),
            measurement(2, "P01", ParameterType::Ph, 4.8), // low-risk deviation
        ];
        let summary = summarize(&measurements);
        assert_eq!(summary.compliance_rate, 50.0);
        assert!(summary
            .recommendations
            .iter()
            .any(|r| r.contains("general review")));
    }

    #[test]
    fn test_recommend_all_clear_when_no_rule_fires() {
        let measurements = vec![
            measurement(1, "P01", ParameterType::Ph, 7.0),
            measurement(2, "P01", ParameterType::Chlorine, 1.0),
        ];
        let summary = summarize(&measurements);
        assert_eq!(
            summary.recommendations,
            vec!["All parameters within regulatory limits for the period.".to_string()]
        );
    }
}
