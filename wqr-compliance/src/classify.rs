//! Classification of a single measured value against a regulatory band.

use serde::{Deserialize, Serialize};
use wqr_core::parameter::ComplianceBand;
use wqr_core::round2;

/// Severity of a band violation, derived strictly from the percentage
/// deviation past the violated bound. Boundaries are inclusive on the
/// lower tier: exactly 10% is Low, exactly 25% is Medium.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    pub fn from_deviation(deviation_pct: f64) -> RiskTier {
        if deviation_pct <= 10.0 {
            RiskTier::Low
        } else if deviation_pct <= 25.0 {
            RiskTier::Medium
        } else {
            RiskTier::High
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            RiskTier::Low => "low",
            RiskTier::Medium => "medium",
            RiskTier::High => "high",
        }
    }
}

/// The verdict for one value against one band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub compliant: bool,
    /// Relative distance past the violated bound, percent, 2 decimals.
    /// Exactly 0 for in-band values.
    pub deviation_pct: f64,
    /// Present only for out-of-band values.
    pub risk: Option<RiskTier>,
}

/// Score `value` against `band`. In-band values are compliant with zero
/// deviation and no risk tier. Out-of-band values carry the relative
/// deviation past the violated bound and the tier it implies.
pub fn classify(value: f64, band: &ComplianceBand) -> Classification {
    if let Some(min) = band.min {
        if value < min {
            let deviation = round2((min - value) / min * 100.0);
            return Classification {
                compliant: false,
                deviation_pct: deviation,
                risk: Some(RiskTier::from_deviation(deviation)),
            };
        }
    }
    if let Some(max) = band.max {
        if value > max {
            let deviation = round2((value - max) / max * 100.0);
            return Classification {
                compliant: false,
                deviation_pct: deviation,
                risk: Some(RiskTier::from_deviation(deviation)),
            };
        }
    }
    Classification {
        compliant: true,
        deviation_pct: 0.0,
        risk: None,
    }
}
