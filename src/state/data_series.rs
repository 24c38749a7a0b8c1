use serde::{Deserialize, Serialize};

use crate::data::datetime::Timestamp;
use crate::data::table::Phase;

/// A named color: the CSS name handed to renderers plus its RGBA value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseColor {
    pub name: &'static str,
    pub rgba: [u8; 4],
}

/// Fixed phase → color mapping. Rendering only; never used for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseColorMap {
    colors: [PhaseColor; 5],
}

impl PhaseColorMap {
    pub const DEFAULT: PhaseColorMap = PhaseColorMap {
        colors: [
            PhaseColor { name: "blue", rgba: [0, 0, 255, 255] },
            PhaseColor { name: "orange", rgba: [255, 165, 0, 255] },
            PhaseColor { name: "green", rgba: [0, 128, 0, 255] },
            PhaseColor { name: "red", rgba: [255, 0, 0, 255] },
            PhaseColor { name: "purple", rgba: [128, 0, 128, 255] },
        ],
    };

    pub fn color_of(&self, phase: Phase) -> PhaseColor {
        self.colors[phase.number() as usize]
    }
}

impl Default for PhaseColorMap {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub x: Timestamp,
    pub y: f64,
}

/// One phase's points as handed to the rendering surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseSeries {
    pub series_label: Phase,
    pub points: Vec<SeriesPoint>,
    pub color: String,
}

impl PhaseSeries {
    pub fn point_count(&self) -> usize {
        self.points.len()
    }
}

/// Renderable chart: axis/legend metadata plus its series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPayload {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub show_legend: bool,
    pub series: Vec<PhaseSeries>,
}

impl ChartPayload {
    /// Phases shown on this chart, in legend order.
    pub fn phases(&self) -> Vec<Phase> {
        self.series.iter().map(|s| s.series_label).collect()
    }

    /// Global x range across all series, as plot coordinates.
    pub fn x_range(&self) -> Option<(f64, f64)> {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for p in self.series.iter().flat_map(|s| s.points.iter()) {
            let x = p.x.as_plot_x();
            min = min.min(x);
            max = max.max(x);
        }
        if min.is_finite() && max.is_finite() {
            Some((min, max))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colors_match_legend() {
        let map = PhaseColorMap::DEFAULT;
        assert_eq!(map.color_of(Phase::Baseline).name, "blue");
        assert_eq!(map.color_of(Phase::Stage4).name, "purple");
    }

    #[test]
    fn series_wire_shape() {
        let series = PhaseSeries {
            series_label: Phase::Stage2,
            points: vec![SeriesPoint {
                x: Timestamp::from_millis(1_527_588_923_123),
                y: 1.5,
            }],
            color: "green".into(),
        };
        let json = serde_json::to_value(&series).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "seriesLabel": 2,
                "points": [{"x": "2018-05-29T10:15:23.123000", "y": 1.5}],
                "color": "green"
            })
        );
    }
}
