use phasescope::data::table::RunLabel;
use phasescope::state::selection::UiEvent;
use phasescope::state::view::ViewMode;

/// Radio buttons for the outlier view. Returns an event when the mode changes.
pub fn view_mode_selector(ui: &mut egui::Ui, current: ViewMode) -> Option<UiEvent> {
    let mut mode = current;
    ui.horizontal(|ui| {
        ui.label(egui::RichText::new("Make a Selection:").strong().size(16.0));
        ui.vertical(|ui| {
            for m in ViewMode::ALL {
                ui.radio_value(&mut mode, m, m.label());
            }
        });
    });
    (mode != current).then_some(UiEvent::SetViewMode(mode))
}

/// Dropdown over the explorable features. Returns the newly picked name.
pub fn feature_combo(
    ui: &mut egui::Ui,
    id: &str,
    current: &str,
    features: &[String],
) -> Option<String> {
    let mut selected = current.to_string();
    egui::ComboBox::from_id_salt(id)
        .width(180.0)
        .selected_text(selected.as_str())
        .show_ui(ui, |ui| {
            for f in features {
                ui.selectable_value(&mut selected, f.clone(), f.as_str());
            }
        });
    (selected != current).then_some(selected)
}

/// Slider stepping over the loaded run labels. It moves by index, so labels
/// with gaps (1, 3) never offer a run the table lacks.
pub fn run_slider(ui: &mut egui::Ui, current: RunLabel, runs: &[RunLabel]) -> Option<UiEvent> {
    let last = runs.len().checked_sub(1)?;
    let mut index = runs.iter().position(|r| *r == current).unwrap_or(0);
    ui.label(egui::RichText::new("*Select Training Set:").strong());
    ui.add(
        egui::Slider::new(&mut index, 0..=last)
            .step_by(1.0)
            .custom_formatter(|v, _| {
                runs.get(v.round() as usize)
                    .map(|r| r.to_string())
                    .unwrap_or_default()
            })
            .custom_parser(|text| {
                runs.iter()
                    .position(|r| r.to_string() == text.trim())
                    .map(|i| i as f64)
            }),
    );
    picked_run(runs, current, index)
}

fn picked_run(runs: &[RunLabel], current: RunLabel, index: usize) -> Option<UiEvent> {
    runs.get(index)
        .filter(|run| **run != current)
        .map(|run| UiEvent::SetRun(*run))
}

/// Render the dashboard's short markdown notes: `####` lines as headings,
/// everything else as plain text.
pub fn show_notes(ui: &mut egui::Ui, text: &str) {
    for line in text.lines() {
        if let Some(heading) = line.strip_prefix("#### ") {
            ui.add_space(4.0);
            ui.label(egui::RichText::new(heading).strong().size(15.0));
        } else if !line.trim().is_empty() {
            ui.label(line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slider_index_maps_onto_loaded_labels() {
        let runs = [RunLabel(1), RunLabel(3), RunLabel(7)];
        assert_eq!(picked_run(&runs, RunLabel(1), 1), Some(UiEvent::SetRun(RunLabel(3))));
        assert_eq!(picked_run(&runs, RunLabel(1), 2), Some(UiEvent::SetRun(RunLabel(7))));
        assert_eq!(picked_run(&runs, RunLabel(3), 1), None);
        assert_eq!(picked_run(&runs, RunLabel(3), 5), None);
    }
}
