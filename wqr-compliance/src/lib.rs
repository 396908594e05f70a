//! Compliance scoring for water quality reports.
//!
//! Three layers: `classify` scores one value against one band, `aggregate`
//! rolls classifications up into report-wide statistics and deterministic
//! recommendations, and `outorga` checks daily consumption against the
//! granted extraction permit.

pub mod aggregate;
pub mod classify;
pub mod outorga;
