use kiddo::KdTree;
use kiddo::SquaredEuclidean;

use crate::data::datetime::Timestamp;
use crate::state::data_series::ChartPayload;

/// A point found by [`HoverTree::nearest`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoverHit {
    pub series_index: usize,
    pub point_index: usize,
    pub timestamp: Timestamp,
    pub y: f64,
}

/// 2D KD-tree over every finite point of a chart, for nearest-point hover
/// lookup. Both axes are scaled to [0, 1] over the chart's data extent so
/// milliseconds and feature units weigh alike.
pub struct HoverTree {
    tree: KdTree<f64, 2>,
    hits: Vec<HoverHit>,
    x_min: f64,
    x_span: f64,
    y_min: f64,
    y_span: f64,
}

impl HoverTree {
    pub fn build(chart: &ChartPayload) -> Self {
        let mut hits = Vec::new();
        for (si, series) in chart.series.iter().enumerate() {
            for (pi, p) in series.points.iter().enumerate() {
                if p.y.is_finite() {
                    hits.push(HoverHit {
                        series_index: si,
                        point_index: pi,
                        timestamp: p.x,
                        y: p.y,
                    });
                }
            }
        }

        let (x_min, x_max) = extent(hits.iter().map(|h| h.timestamp.as_plot_x()));
        let (y_min, y_max) = extent(hits.iter().map(|h| h.y));
        let x_span = span(x_min, x_max);
        let y_span = span(y_min, y_max);

        let mut tree: KdTree<f64, 2> = KdTree::new();
        for (i, hit) in hits.iter().enumerate() {
            // kiddo buckets cannot split runs of identical values on an axis
            // (flat signals), so every item gets a sub-pixel offset.
            let nudge = i as f64 * 1e-12;
            let q = [
                (hit.timestamp.as_plot_x() - x_min) / x_span + nudge,
                (hit.y - y_min) / y_span + nudge,
            ];
            tree.add(&q, i as u64);
        }

        Self {
            tree,
            hits,
            x_min,
            x_span,
            y_min,
            y_span,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Nearest point to data coordinates (x, y).
    pub fn nearest(&self, x: f64, y: f64) -> Option<HoverHit> {
        if self.hits.is_empty() {
            return None;
        }
        let q = [(x - self.x_min) / self.x_span, (y - self.y_min) / self.y_span];
        let result = self.tree.nearest_one::<SquaredEuclidean>(&q);
        self.hits.get(result.item as usize).copied()
    }
}

fn extent(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}

fn span(min: f64, max: f64) -> f64 {
    let s = max - min;
    if s.is_finite() && s.abs() > 1e-15 {
        s
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::table::Phase;
    use crate::state::data_series::{PhaseSeries, SeriesPoint};

    fn chart() -> ChartPayload {
        let series = |phase, pts: &[(i64, f64)]| PhaseSeries {
            series_label: phase,
            points: pts
                .iter()
                .map(|&(ms, y)| SeriesPoint {
                    x: Timestamp::from_millis(ms),
                    y,
                })
                .collect(),
            color: String::new(),
        };
        ChartPayload {
            title: String::new(),
            x_label: String::new(),
            y_label: String::new(),
            show_legend: false,
            series: vec![
                series(Phase::Stage1, &[(0, 0.0), (1_000, 1.0)]),
                series(Phase::Stage2, &[(2_000, f64::NAN), (3_000, 10.0)]),
            ],
        }
    }

    #[test]
    fn finds_nearest_point_across_series() {
        let tree = HoverTree::build(&chart());
        let hit = tree.nearest(2_900.0, 9.0).unwrap();
        assert_eq!(hit.series_index, 1);
        assert_eq!(hit.point_index, 1);
        assert_eq!(hit.timestamp, Timestamp::from_millis(3_000));
    }

    #[test]
    fn skips_nan_points() {
        let tree = HoverTree::build(&chart());
        let hit = tree.nearest(2_000.0, 5.0).unwrap();
        assert_ne!(hit.timestamp, Timestamp::from_millis(2_000));
    }

    #[test]
    fn empty_chart_has_no_hits() {
        let mut empty = chart();
        empty.series.clear();
        let tree = HoverTree::build(&empty);
        assert!(tree.is_empty());
        assert!(tree.nearest(0.0, 0.0).is_none());
    }
}
