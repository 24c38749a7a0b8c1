use serde::{Deserialize, Serialize};

use crate::data::datetime::Timestamp;
use crate::data::table::{RunLabel, Table};
use crate::error::SelectionError;
use crate::state::view::ViewMode;

/// The user's current UI choices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub run_label: RunLabel,
    pub left_feature: String,
    pub right_feature: String,
    pub view_mode: ViewMode,
}

/// Last point hovered on the test-set chart.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum HoverState {
    #[default]
    Empty,
    Active { timestamp: Timestamp, feature: String },
}

impl HoverState {
    pub fn is_active(&self) -> bool {
        matches!(self, HoverState::Active { .. })
    }
}

/// Hover payload as emitted by a chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoverEvent {
    pub x: String,
}

impl HoverEvent {
    pub fn at(timestamp: Timestamp) -> Self {
        Self {
            x: timestamp.to_display(),
        }
    }
}

/// What a view-mode switch does to an active hover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoverResetPolicy {
    /// Hover survives the switch.
    #[default]
    Keep,
    ResetOnViewSwitch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    SetViewMode(ViewMode),
    SetLeftFeature(String),
    SetRightFeature(String),
    SetRun(RunLabel),
    Hover(HoverEvent),
    Unhover,
}

/// One user's selection and hover. The table is shared; this is not.
#[derive(Debug, Clone)]
pub struct Session {
    selection: Selection,
    hover: HoverState,
    features: Vec<String>,
    hover_policy: HoverResetPolicy,
}

impl Session {
    /// `features` is the list the dropdowns offer; selections outside it are
    /// rejected.
    pub fn new(
        selection: Selection,
        features: Vec<String>,
        hover_policy: HoverResetPolicy,
    ) -> Self {
        Self {
            selection,
            hover: HoverState::Empty,
            features,
            hover_policy,
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn hover(&self) -> &HoverState {
        &self.hover
    }

    pub fn features(&self) -> &[String] {
        &self.features
    }

    /// Apply a UI event. Returns whether anything changed; on error the
    /// session is untouched.
    pub fn apply(&mut self, table: &Table, event: UiEvent) -> Result<bool, SelectionError> {
        match event {
            UiEvent::SetViewMode(mode) => {
                if self.selection.view_mode == mode {
                    return Ok(false);
                }
                self.selection.view_mode = mode;
                if self.hover_policy == HoverResetPolicy::ResetOnViewSwitch {
                    self.hover = HoverState::Empty;
                }
                Ok(true)
            }
            UiEvent::SetLeftFeature(name) => {
                self.check_feature(&name)?;
                Ok(replace(&mut self.selection.left_feature, name))
            }
            UiEvent::SetRightFeature(name) => {
                self.check_feature(&name)?;
                Ok(replace(&mut self.selection.right_feature, name))
            }
            UiEvent::SetRun(run) => {
                if !table.has_run(run) {
                    return Err(SelectionError::UnknownRun(run.0));
                }
                Ok(replace(&mut self.selection.run_label, run))
            }
            UiEvent::Hover(event) => {
                let hover = match Timestamp::parse_display(&event.x) {
                    Some(timestamp) => HoverState::Active {
                        timestamp,
                        feature: self.selection.left_feature.clone(),
                    },
                    None => {
                        tracing::debug!("Ignoring hover with unreadable x \"{}\"", event.x);
                        HoverState::Empty
                    }
                };
                Ok(replace(&mut self.hover, hover))
            }
            UiEvent::Unhover => Ok(replace(&mut self.hover, HoverState::Empty)),
        }
    }

    fn check_feature(&self, name: &str) -> Result<(), SelectionError> {
        if self.features.iter().any(|f| f == name) {
            Ok(())
        } else {
            Err(SelectionError::UnknownFeature(name.to_string()))
        }
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::table::{Observation, Phase};

    fn table() -> Table {
        let rows = [1, 2]
            .into_iter()
            .map(|run| Observation {
                timestamp: Timestamp::from_millis(i64::from(run)),
                phase: Phase::Stage1,
                run_label: RunLabel(run),
                values: vec![0.0, 0.0],
            })
            .collect();
        Table::new("t".into(), vec!["a".into(), "b".into()], rows)
    }

    fn session(policy: HoverResetPolicy) -> Session {
        Session::new(
            Selection {
                run_label: RunLabel(1),
                left_feature: "a".into(),
                right_feature: "b".into(),
                view_mode: ViewMode::Original,
            },
            vec!["a".into(), "b".into()],
            policy,
        )
    }

    #[test]
    fn unknown_feature_leaves_selection_alone() {
        let table = table();
        let mut s = session(HoverResetPolicy::Keep);
        let before = s.selection().clone();
        assert_eq!(
            s.apply(&table, UiEvent::SetLeftFeature("zzz".into())),
            Err(SelectionError::UnknownFeature("zzz".into()))
        );
        assert_eq!(s.selection(), &before);
    }

    #[test]
    fn unknown_run_is_rejected() {
        let table = table();
        let mut s = session(HoverResetPolicy::Keep);
        assert_eq!(
            s.apply(&table, UiEvent::SetRun(RunLabel(3))),
            Err(SelectionError::UnknownRun(3))
        );
        assert_eq!(s.apply(&table, UiEvent::SetRun(RunLabel(2))), Ok(true));
        assert_eq!(s.apply(&table, UiEvent::SetRun(RunLabel(2))), Ok(false));
    }

    #[test]
    fn hover_and_unhover() {
        let table = table();
        let mut s = session(HoverResetPolicy::Keep);
        let ts = Timestamp::from_millis(2);
        assert_eq!(s.apply(&table, UiEvent::Hover(HoverEvent::at(ts))), Ok(true));
        assert_eq!(
            s.hover(),
            &HoverState::Active {
                timestamp: ts,
                feature: "a".into()
            }
        );
        assert_eq!(s.apply(&table, UiEvent::Unhover), Ok(true));
        assert_eq!(s.hover(), &HoverState::Empty);
    }

    #[test]
    fn unreadable_hover_clears_state() {
        let table = table();
        let mut s = session(HoverResetPolicy::Keep);
        s.apply(&table, UiEvent::Hover(HoverEvent::at(Timestamp::from_millis(1))))
            .unwrap();
        s.apply(&table, UiEvent::Hover(HoverEvent { x: "??".into() }))
            .unwrap();
        assert!(!s.hover().is_active());
    }

    #[test]
    fn hover_policy_on_view_switch() {
        let table = table();
        let hover = UiEvent::Hover(HoverEvent::at(Timestamp::from_millis(1)));

        let mut keep = session(HoverResetPolicy::Keep);
        keep.apply(&table, hover.clone()).unwrap();
        keep.apply(&table, UiEvent::SetViewMode(ViewMode::AfterRemoval))
            .unwrap();
        assert!(keep.hover().is_active());

        let mut reset = session(HoverResetPolicy::ResetOnViewSwitch);
        reset.apply(&table, hover).unwrap();
        reset
            .apply(&table, UiEvent::SetViewMode(ViewMode::AfterRemoval))
            .unwrap();
        assert!(!reset.hover().is_active());
        assert_eq!(reset.selection().view_mode, ViewMode::AfterRemoval);
    }
}
