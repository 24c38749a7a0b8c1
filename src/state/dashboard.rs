use serde::Serialize;

use crate::data::table::{Phase, Table};
use crate::error::ViewError;
use crate::processing::cross_filter::dependent_phases;
use crate::processing::phase_filter::filter_by_phase;
use crate::processing::projection::project;
use crate::state::data_series::{ChartPayload, PhaseColorMap};
use crate::state::selection::{HoverState, Selection};
use crate::state::view::{resolve_view, AFTER_REMOVAL_PHASES, EXPLORATION_NOTES};

/// Everything the dashboard shows for one (selection, hover) pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub outlier_chart: ChartPayload,
    pub outlier_explanation: &'static str,
    pub test_set_chart: ChartPayload,
    pub top_chart: ChartPayload,
    pub bottom_chart: ChartPayload,
    pub exploration_notes: &'static str,
}

impl DashboardView {
    /// Compute all charts. Pure: the same inputs always give the same view.
    pub fn build(
        table: &Table,
        target_feature: &str,
        selection: &Selection,
        hover: &HoverState,
    ) -> Result<Self, ViewError> {
        let colors = PhaseColorMap::DEFAULT;
        let target = table.feature(target_feature)?;
        let left = table.feature(&selection.left_feature)?;
        let right = table.feature(&selection.right_feature)?;

        let (view_phases, explanation) = resolve_view(selection.view_mode);
        let outlier_chart = ChartPayload {
            title: "Transient Output during each Test Phase".to_string(),
            x_label: table.timestamp_column().to_string(),
            y_label: table.feature_name(target).to_string(),
            show_legend: true,
            series: project(&filter_by_phase(table, view_phases, None), target, &colors),
        };

        let test_set_chart = ChartPayload {
            title: format!("Training Set {}", selection.run_label),
            x_label: String::new(),
            y_label: table.feature_name(left).to_string(),
            show_legend: false,
            series: project(
                &filter_by_phase(table, &AFTER_REMOVAL_PHASES, Some(selection.run_label)),
                left,
                &colors,
            ),
        };

        let phases = dependent_phases(table, hover, &AFTER_REMOVAL_PHASES)?;
        let dependent = filter_by_phase(table, &phases, None);
        let top_chart = ChartPayload {
            title: format!(
                "Compare trends across phases of {} & {}",
                selection.left_feature, selection.right_feature
            ),
            x_label: String::new(),
            y_label: table.feature_name(left).to_string(),
            show_legend: false,
            series: project(&dependent, left, &colors),
        };
        let bottom_chart = ChartPayload {
            title: String::new(),
            x_label: String::new(),
            y_label: table.feature_name(right).to_string(),
            show_legend: false,
            series: project(&dependent, right, &colors),
        };

        Ok(Self {
            outlier_chart,
            outlier_explanation: explanation,
            test_set_chart,
            top_chart,
            bottom_chart,
            exploration_notes: EXPLORATION_NOTES,
        })
    }

    /// Phases the two comparison charts are narrowed to.
    pub fn dependent_phases(&self) -> Vec<Phase> {
        self.top_chart.phases()
    }
}
