//! Sample bundles: one timestamped set of parameter readings per point.

use crate::measurement::Measurement;
use crate::parameter::{ComplianceBand, ParameterType};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One collection event at a point: whichever of the three parameters were
/// read together, plus the compliance verdict over the parameters present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub timestamp: NaiveDateTime,
    pub point_id: String,
    pub ph: Option<f64>,
    pub chlorine: Option<f64>,
    pub turbidity: Option<f64>,
    /// AND of the per-parameter verdicts for the parameters present.
    /// A sample with no readings at all is vacuously compliant, but
    /// `build_samples` never produces one.
    pub overall_compliant: bool,
    pub non_compliance_count: usize,
}

impl Sample {
    pub fn value_of(&self, parameter: ParameterType) -> Option<f64> {
        match parameter {
            ParameterType::Ph => self.ph,
            ParameterType::Chlorine => self.chlorine,
            ParameterType::Turbidity => self.turbidity,
        }
    }

    /// Group measurements into samples by (point, timestamp) and score each
    /// present parameter against its regulatory band. Output is ordered by
    /// point id, then timestamp. When the same parameter appears twice at
    /// one timestamp the later row wins inside the bundle; aggregation
    /// still counts every measurement individually.
    pub fn build_samples(measurements: &[Measurement]) -> Vec<Sample> {
        let mut grouped: BTreeMap<(String, NaiveDateTime), Vec<&Measurement>> = BTreeMap::new();
        for measurement in measurements {
            grouped
                .entry((measurement.point_id.clone(), measurement.timestamp))
                .or_default()
                .push(measurement);
        }

        grouped
            .into_iter()
            .map(|((point_id, timestamp), bundle)| {
                let mut sample = Sample {
                    timestamp,
                    point_id,
                    ph: None,
                    chlorine: None,
                    turbidity: None,
                    overall_compliant: true,
                    non_compliance_count: 0,
                };
                for measurement in &bundle {
                    match measurement.parameter {
                        ParameterType::Ph => sample.ph = Some(measurement.value),
                        ParameterType::Chlorine => sample.chlorine = Some(measurement.value),
                        ParameterType::Turbidity => sample.turbidity = Some(measurement.value),
                    }
                }
                for parameter in crate::parameter::ALL_PARAMETERS {
                    if let Some(value) = sample.value_of(parameter) {
                        let band = ComplianceBand::for_parameter(parameter);
                        if !band.contains(value) {
                            sample.overall_compliant = false;
                            sample.non_compliance_count += 1;
                        }
                    }
                }
                sample
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn measurement(point: &str, ts: NaiveDateTime, parameter: ParameterType, value: f64) -> Measurement {
        Measurement {
            timestamp: ts,
            point_id: point.to_string(),
            parameter,
            value,
        }
    }

    #[test]
    fn test_build_samples_groups_by_point_and_timestamp() {
        let measurements = vec![
            measurement("P01", at(4, 8), ParameterType::Ph, 7.0),
            measurement("P01", at(4, 8), ParameterType::Chlorine, 1.0),
            measurement("P01", at(5, 8), ParameterType::Ph, 7.2),
            measurement("P02", at(4, 8), ParameterType::Turbidity, 2.0),
        ];
        let samples = Sample::build_samples(&measurements);
        assert_eq!(samples.len(), 3);
        assert_eq!(samples[0].point_id, "P01");
        assert_eq!(samples[0].ph, Some(7.0));
        assert_eq!(samples[0].chlorine, Some(1.0));
        assert_eq!(samples[0].turbidity, None);
        assert_eq!(samples[2].point_id, "P02");
    }

    #[test]
    fn test_overall_compliance_is_and_of_present_parameters() {
        let measurements = vec![
            measurement("P01", at(4, 8), ParameterType::Ph, 7.0),
            measurement("P01", at(4, 8), ParameterType::Chlorine, 6.5),
        ];
        let samples = Sample::build_samples(&measurements);
        assert_eq!(samples.len(), 1);
        assert!(!samples[0].overall_compliant);
        assert_eq!(samples[0].non_compliance_count, 1);
    }

    #[test]
    fn test_all_present_parameters_compliant() {
        let measurements = vec![
            measurement("P01", at(4, 8), ParameterType::Ph, 7.0),
            measurement("P01", at(4, 8), ParameterType::Chlorine, 1.5),
            measurement("P01", at(4, 8), ParameterType::Turbidity, 0.8),
        ];
        let samples = Sample::build_samples(&measurements);
        assert!(samples[0].overall_compliant);
        assert_eq!(samples[0].non_compliance_count, 0);
    }

    #[test]
    fn test_duplicate_parameter_later_row_wins() {
        let measurements = vec![
            measurement("P01", at(4, 8), ParameterType::Ph, 4.0),
            measurement("P01", at(4, 8), ParameterType::Ph, 7.0),
        ];
        let samples = Sample::build_samples(&measurements);
        assert_eq!(samples[0].ph, Some(7.0));
        assert!(samples[0].overall_compliant);
    }
}
