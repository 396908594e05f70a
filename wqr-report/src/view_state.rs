//! Explicit per-report chart visibility.
//!
//! Visibility is an argument threaded into rendering, never ambient UI
//! state. Statistics shown for a visibility set are a pure derived view
//! over the full dataset; nothing is recomputed in place when a series is
//! toggled.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use wqr_compliance::aggregate::{ComplianceSummary, ParameterStats};
use wqr_core::parameter::{ParameterType, ALL_PARAMETERS};

/// Which parameter series are visible in quality charts and stats tables.
/// Parameters absent from the map default to visible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportViewState {
    visible: BTreeMap<ParameterType, bool>,
}

impl Default for ReportViewState {
    fn default() -> Self {
        ReportViewState::all_visible()
    }
}

impl ReportViewState {
    pub fn all_visible() -> ReportViewState {
        ReportViewState {
            visible: ALL_PARAMETERS.iter().map(|p| (*p, true)).collect(),
        }
    }

    pub fn is_visible(&self, parameter: ParameterType) -> bool {
        self.visible.get(&parameter).copied().unwrap_or(true)
    }

    pub fn set_visible(&mut self, parameter: ParameterType, visible: bool) {
        self.visible.insert(parameter, visible);
    }

    /// Visible parameters in the fixed report order.
    pub fn visible_parameters(&self) -> Vec<ParameterType> {
        ALL_PARAMETERS
            .iter()
            .copied()
            .filter(|p| self.is_visible(*p))
            .collect()
    }
}

/// The parameter statistics to display under a visibility set: a pure
/// filter over the full summary, recomputed on every call.
pub fn visible_stats<'a>(
    summary: &'a ComplianceSummary,
    view: &ReportViewState,
) -> Vec<&'a ParameterStats> {
    summary
        .parameter_stats
        .iter()
        .filter(|stats| view.is_visible(stats.parameter))
        .collect()
}
