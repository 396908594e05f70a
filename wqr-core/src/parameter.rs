//! Water quality parameters and their regulatory bands.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The measured water quality parameters tracked by the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ParameterType {
    Ph,
    Chlorine,
    Turbidity,
}

/// All parameters in their fixed report order. Recommendation rules and
/// page layouts iterate in this order so output stays deterministic.
pub const ALL_PARAMETERS: [ParameterType; 3] = [
    ParameterType::Ph,
    ParameterType::Chlorine,
    ParameterType::Turbidity,
];

impl ParameterType {
    /// Unit suffix shown next to formatted values. pH is dimensionless.
    pub fn unit(&self) -> &'static str {
        match self {
            ParameterType::Ph => "",
            ParameterType::Chlorine => "mg/L",
            ParameterType::Turbidity => "NTU",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ParameterType::Ph => "pH",
            ParameterType::Chlorine => "Chlorine",
            ParameterType::Turbidity => "Turbidity",
        }
    }

    /// Resolve a source row's parameter label. Matching is lenient about
    /// case and common Portuguese spellings used by outorga systems.
    pub fn from_label(label: &str) -> Option<ParameterType> {
        match label.trim().to_lowercase().as_str() {
            "ph" => Some(ParameterType::Ph),
            "chlorine" | "cloro" | "free chlorine" | "cloro livre" => Some(ParameterType::Chlorine),
            "turbidity" | "turbidez" => Some(ParameterType::Turbidity),
            _ => None,
        }
    }
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// The regulatory range a measured value must fall inside. Either bound
/// may be absent: chlorine and turbidity carry only a maximum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComplianceBand {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl ComplianceBand {
    /// The band compliance scoring uses for a parameter.
    pub fn for_parameter(parameter: ParameterType) -> ComplianceBand {
        match parameter {
            ParameterType::Ph => ComplianceBand {
                min: Some(5.0),
                max: Some(9.0),
            },
            ParameterType::Chlorine => ComplianceBand {
                min: None,
                max: Some(5.0),
            },
            ParameterType::Turbidity => ComplianceBand {
                min: None,
                max: Some(5.0),
            },
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        if let Some(min) = self.min {
            if value < min {
                return false;
            }
        }
        if let Some(max) = self.max {
            if value > max {
                return false;
            }
        }
        true
    }
}

/// Operator display range for pH (6.5 to 8.5). Shown on summary pages as
/// an operational target; never consulted by compliance scoring, which uses
/// `ComplianceBand::for_parameter(ParameterType::Ph)`.
pub fn operator_ph_range() -> ComplianceBand {
    ComplianceBand {
        min: Some(6.5),
        max: Some(8.5),
    }
}

/// Parameter classification for a row whose type label did not resolve.
/// A guess never silently enters compliance scoring; callers must match
/// and decide what a `Known` fallback is worth.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ParameterGuess {
    Known(ParameterType),
    Unknown,
}

/// Infer a parameter from a raw value when the source row carries no usable
/// label. Only the pH scale is narrow enough to support a guess: values on
/// [0, 14] are read as pH, anything else stays unknown.
pub fn infer_parameter(label: &str, value: f64) -> ParameterGuess {
    if let Some(parameter) = ParameterType::from_label(label) {
        return ParameterGuess::Known(parameter);
    }
    if (0.0..=14.0).contains(&value) && label.trim().is_empty() {
        return ParameterGuess::Known(ParameterType::Ph);
    }
    ParameterGuess::Unknown
}
