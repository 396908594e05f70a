//! Core types for water quality compliance reporting.
//!
//! Measurements, samples, parameter bands, outorga (extraction permit)
//! limits, and the CSV row shapes delivered by the measurement source.

pub mod dates;
pub mod date_range;
pub mod error;
pub mod measurement;
pub mod parameter;
pub mod point;
pub mod sample;

/// Round a value to two decimal places, the precision used everywhere a
/// number reaches a report page.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
