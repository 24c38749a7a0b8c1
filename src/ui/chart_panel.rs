use egui_plot::{Legend, Plot, PlotPoint, Points};

use phasescope::data::datetime::{self, Timestamp};
use phasescope::processing::downsampling;
use phasescope::processing::kd_tree::{HoverHit, HoverTree};
use phasescope::state::data_series::{ChartPayload, PhaseColorMap};

/// Above this many visible points a series is thinned before drawing.
const MAX_DRAWN_POINTS: usize = 10_000;

/// How close (in pixels) the pointer must be to a point to hover it.
const HOVER_RADIUS_PX: f32 = 8.0;

const MARKER_RADIUS: f32 = 1.5;

/// Draw one chart. When `hover_tree` is given, the chart is a hover source and
/// the point under the pointer (if any) is returned.
pub fn show_chart(
    ui: &mut egui::Ui,
    id: &str,
    chart: &ChartPayload,
    height: f32,
    hover_tree: Option<&HoverTree>,
) -> Option<HoverHit> {
    if !chart.title.is_empty() {
        ui.vertical_centered(|ui| {
            ui.label(egui::RichText::new(&chart.title).strong().size(15.0));
        });
    }

    let span = chart.x_range().map(|(lo, hi)| hi - lo).unwrap_or(0.0);
    let mut plot = Plot::new(id)
        .height(height)
        .allow_scroll(false)
        .x_axis_formatter(move |mark, _range| datetime::format_tick(mark.value, span))
        .label_formatter(|name, value| {
            let when = Timestamp::from_plot_x(value.x).to_display();
            if name.is_empty() {
                format!("{when}\n{:.3}", value.y)
            } else {
                format!("phase {name}\n{when}\n{:.3}", value.y)
            }
        })
        .y_axis_label(chart.y_label.clone());
    if !chart.x_label.is_empty() {
        plot = plot.x_axis_label(chart.x_label.clone());
    }
    if chart.show_legend {
        plot = plot.legend(Legend::default());
    }

    let colors = PhaseColorMap::DEFAULT;
    let response = plot.show(ui, |plot_ui| {
        let bounds = plot_ui.plot_bounds();
        let (x_min, x_max) = if bounds.min()[0].is_finite()
            && bounds.max()[0].is_finite()
            && bounds.min()[0] < bounds.max()[0]
        {
            (bounds.min()[0], bounds.max()[0])
        } else {
            (f64::NEG_INFINITY, f64::INFINITY)
        };

        for series in &chart.series {
            let points: Vec<[f64; 2]> = series
                .points
                .iter()
                .map(|p| [p.x.as_plot_x(), p.y])
                .collect();
            let drawn = downsampling::thin_for_view(&points, x_min, x_max, MAX_DRAWN_POINTS);
            let [r, g, b, a] = colors.color_of(series.series_label).rgba;
            // Empty phases are still added so the legend lists them.
            plot_ui.points(
                Points::new(drawn)
                    .color(egui::Color32::from_rgba_unmultiplied(r, g, b, a))
                    .radius(MARKER_RADIUS)
                    .name(series.series_label.to_string()),
            );
        }
        plot_ui.pointer_coordinate()
    });

    let tree = hover_tree?;
    let pointer = response.inner?;
    let screen_pos = response.response.hover_pos()?;
    let hit = tree.nearest(pointer.x, pointer.y)?;
    let hit_pos = response
        .transform
        .position_from_point(&PlotPoint::new(hit.timestamp.as_plot_x(), hit.y));
    (hit_pos.distance(screen_pos) <= HOVER_RADIUS_PX).then_some(hit)
}
