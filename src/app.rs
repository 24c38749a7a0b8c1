use std::sync::Arc;

use eframe::egui;

use phasescope::config::DashboardConfig;
use phasescope::data::datetime::Timestamp;
use phasescope::data::table::{RunLabel, Table};
use phasescope::error::{HoverError, ViewError};
use phasescope::processing::kd_tree::HoverTree;
use phasescope::state::dashboard::DashboardView;
use phasescope::state::selection::{HoverEvent, HoverState, Session, UiEvent};

use crate::ui::chart_panel::show_chart;
use crate::ui::controls;

/// The PhaseScope dashboard window. Owns one session over a shared table.
pub struct PhaseScopeApp {
    table: Arc<Table>,
    target_feature: String,
    runs: Vec<RunLabel>,
    session: Session,
    view: Option<DashboardView>,
    /// Hover lookup over the current test-set chart.
    hover_tree: Option<HoverTree>,
    /// A timestamp whose phase lookup failed; hovering it again is ignored.
    blocked_hover: Option<Timestamp>,
    dirty: bool,
    /// Last rejected selection or integrity error, shown until dismissed.
    error_message: Option<String>,
}

impl PhaseScopeApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        table: Arc<Table>,
        config: &DashboardConfig,
    ) -> Self {
        let ctx = &cc.egui_ctx;
        let mut style = (*ctx.style()).clone();
        style.text_styles.insert(
            egui::TextStyle::Body,
            egui::FontId::proportional(14.5),
        );
        style.text_styles.insert(
            egui::TextStyle::Heading,
            egui::FontId::proportional(22.0),
        );
        style.spacing.item_spacing = egui::vec2(8.0, 6.0);
        style.spacing.button_padding = egui::vec2(10.0, 5.0);
        ctx.set_style(style);

        let session = Session::new(
            config.initial.clone(),
            config.features.clone(),
            config.hover_reset,
        );

        Self {
            runs: table.run_labels(),
            table,
            target_feature: config.target_feature.clone(),
            session,
            view: None,
            hover_tree: None,
            blocked_hover: None,
            dirty: true,
            error_message: None,
        }
    }

    fn dispatch(&mut self, event: UiEvent) {
        match self.session.apply(&self.table, event) {
            Ok(changed) => self.dirty |= changed,
            Err(e) => {
                tracing::warn!("Rejected selection: {e}");
                self.error_message = Some(e.to_string());
            }
        }
    }

    /// Rebuild the view model after the session changed.
    fn refresh(&mut self) {
        if !self.dirty {
            return;
        }
        self.dirty = false;

        let built = DashboardView::build(
            &self.table,
            &self.target_feature,
            self.session.selection(),
            self.session.hover(),
        );
        match built {
            Ok(view) => {
                let test_set_changed = self
                    .view
                    .as_ref()
                    .map_or(true, |old| old.test_set_chart != view.test_set_chart);
                if test_set_changed {
                    self.hover_tree = Some(HoverTree::build(&view.test_set_chart));
                }
                self.view = Some(view);
            }
            Err(e) => {
                tracing::error!("Cannot build dashboard view: {e}");
                if let ViewError::Hover(HoverError::Ambiguous { timestamp, .. }) = &e {
                    self.blocked_hover = Some(*timestamp);
                }
                self.error_message = Some(e.to_string());
                self.dispatch(UiEvent::Unhover);
                self.dirty = true;
            }
        }
    }

    /// Turn the test-set chart's hover result into session events.
    fn hover_event(&mut self, hit: Option<Timestamp>) -> Option<UiEvent> {
        let current = match self.session.hover() {
            HoverState::Active { timestamp, .. } => Some(*timestamp),
            HoverState::Empty => None,
        };
        next_hover(current, &mut self.blocked_hover, hit)
    }
}

/// Hover transition for one frame. A blocked timestamp stays ignored until the
/// pointer lands on a different point.
fn next_hover(
    current: Option<Timestamp>,
    blocked: &mut Option<Timestamp>,
    hit: Option<Timestamp>,
) -> Option<UiEvent> {
    match hit {
        Some(ts) if Some(ts) == *blocked => None,
        Some(ts) => {
            *blocked = None;
            (Some(ts) != current).then(|| UiEvent::Hover(HoverEvent::at(ts)))
        }
        None => current.map(|_| UiEvent::Unhover),
    }
}

impl eframe::App for PhaseScopeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.refresh();

        let mut events: Vec<UiEvent> = Vec::new();
        let mut test_set_hit: Option<Timestamp> = None;

        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(view) = self.view.as_ref() else {
                ui.centered_and_justified(|ui| ui.label("No data"));
                return;
            };
            let selection = self.session.selection();

            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.vertical_centered(|ui| ui.heading("Target Outlier Detection and Removal"));
                events.extend(controls::view_mode_selector(ui, selection.view_mode));
                show_chart(ui, "outlier_chart", &view.outlier_chart, 320.0, None);
                controls::show_notes(ui, view.outlier_explanation);

                ui.add_space(40.0);
                ui.vertical_centered(|ui| ui.heading("Feature Exploration"));
                ui.label(
                    egui::RichText::new(
                        "*Hover over datapoints within any phase on the left figure to closely \
                         examine the corresponding phase on both right figures",
                    )
                    .italics(),
                );

                let total_width = ui.available_width();
                let spacing = ui.spacing().item_spacing.x;
                let left_width = total_width * 0.3 - spacing;
                let right_width = total_width * 0.7 - spacing;

                ui.horizontal(|ui| {
                    ui.vertical(|ui| {
                        ui.set_width(left_width);
                        if let Some(f) = controls::feature_combo(
                            ui,
                            "left_feature",
                            &selection.left_feature,
                            self.session.features(),
                        ) {
                            events.push(UiEvent::SetLeftFeature(f));
                        }
                    });
                    ui.vertical(|ui| {
                        ui.set_width(right_width);
                        if let Some(f) = controls::feature_combo(
                            ui,
                            "right_feature",
                            &selection.right_feature,
                            self.session.features(),
                        ) {
                            events.push(UiEvent::SetRightFeature(f));
                        }
                    });
                });

                ui.horizontal_top(|ui| {
                    ui.vertical(|ui| {
                        ui.set_width(left_width);
                        events.extend(controls::run_slider(ui, selection.run_label, &self.runs));
                        test_set_hit = show_chart(
                            ui,
                            "test_set_chart",
                            &view.test_set_chart,
                            360.0,
                            self.hover_tree.as_ref(),
                        )
                        .map(|hit| hit.timestamp);
                        controls::show_notes(ui, view.exploration_notes);
                    });
                    ui.vertical(|ui| {
                        ui.set_width(right_width);
                        show_chart(ui, "top_chart", &view.top_chart, 260.0, None);
                        show_chart(ui, "bottom_chart", &view.bottom_chart, 260.0, None);
                    });
                });
            });
        });

        if let Some(msg) = self.error_message.clone() {
            let mut open = true;
            egui::Window::new("Error")
                .collapsible(false)
                .resizable(false)
                .open(&mut open)
                .show(ctx, |ui| {
                    ui.label(msg.as_str());
                });
            if !open {
                self.error_message = None;
            }
        }

        if self.view.is_some() {
            events.extend(self.hover_event(test_set_hit));
        }
        for event in events {
            self.dispatch(event);
        }
        if self.dirty {
            ctx.request_repaint();
        }
    }
}
