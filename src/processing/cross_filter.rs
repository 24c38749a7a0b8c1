use std::collections::BTreeSet;

use crate::data::table::{Phase, Table};
use crate::error::HoverError;
use crate::state::selection::HoverState;

/// Reverse lookup from a hovered point to the phase it belongs to.
///
/// `Ok(None)` means nothing is hovered. Every row stored at the hovered
/// timestamp must agree on the phase; disagreement is reported rather than
/// resolved.
pub fn resolve_hover(table: &Table, hover: &HoverState) -> Result<Option<Phase>, HoverError> {
    let HoverState::Active { timestamp, .. } = hover else {
        return Ok(None);
    };

    let phases: BTreeSet<Phase> = table.rows_at(*timestamp).map(|r| r.phase).collect();
    let mut iter = phases.iter().copied();
    match (iter.next(), iter.next()) {
        (None, _) => Err(HoverError::Stale(*timestamp)),
        (Some(phase), None) => Ok(Some(phase)),
        (Some(_), Some(_)) => Err(HoverError::Ambiguous {
            timestamp: *timestamp,
            phases: phases.into_iter().collect(),
        }),
    }
}

/// Phases the dependent charts should show for the current hover.
///
/// Falls back to `fallback` when nothing is hovered or the hover is stale.
/// An ambiguous timestamp is still an error.
pub fn dependent_phases(
    table: &Table,
    hover: &HoverState,
    fallback: &[Phase],
) -> Result<Vec<Phase>, HoverError> {
    match resolve_hover(table, hover) {
        Ok(Some(phase)) => Ok(vec![phase]),
        Ok(None) => Ok(fallback.to_vec()),
        Err(HoverError::Stale(ts)) => {
            tracing::debug!("Stale hover at {ts}, showing default phases");
            Ok(fallback.to_vec())
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::datetime::Timestamp;
    use crate::data::table::{Observation, RunLabel};
    use crate::state::view::AFTER_REMOVAL_PHASES;

    fn table(layout: &[(i64, u8)]) -> Table {
        let rows = layout
            .iter()
            .map(|&(ms, p)| Observation {
                timestamp: Timestamp::from_millis(ms),
                phase: Phase::from_number(i64::from(p)).unwrap(),
                run_label: RunLabel(1),
                values: vec![0.0],
            })
            .collect();
        Table::new("t".into(), vec!["v".into()], rows)
    }

    fn hover_at(ms: i64) -> HoverState {
        HoverState::Active {
            timestamp: Timestamp::from_millis(ms),
            feature: "v".into(),
        }
    }

    #[test]
    fn empty_hover_resolves_to_none() {
        assert_eq!(resolve_hover(&table(&[(1, 1)]), &HoverState::Empty), Ok(None));
        assert_eq!(resolve_hover(&table(&[]), &HoverState::Empty), Ok(None));
    }

    #[test]
    fn exact_timestamp_resolves_phase() {
        let t = table(&[(100, 1), (200, 2), (300, 3)]);
        assert_eq!(resolve_hover(&t, &hover_at(200)), Ok(Some(Phase::Stage2)));
    }

    #[test]
    fn duplicate_timestamp_with_same_phase_is_fine() {
        let t = table(&[(100, 3), (100, 3)]);
        assert_eq!(resolve_hover(&t, &hover_at(100)), Ok(Some(Phase::Stage3)));
    }

    #[test]
    fn conflicting_phases_are_reported() {
        let t = table(&[(100, 1), (100, 2)]);
        assert_eq!(
            resolve_hover(&t, &hover_at(100)),
            Err(HoverError::Ambiguous {
                timestamp: Timestamp::from_millis(100),
                phases: vec![Phase::Stage1, Phase::Stage2],
            })
        );
        assert!(dependent_phases(&t, &hover_at(100), &AFTER_REMOVAL_PHASES).is_err());
    }

    #[test]
    fn stale_hover_falls_back() {
        let t = table(&[(100, 1)]);
        assert_eq!(
            resolve_hover(&t, &hover_at(999)),
            Err(HoverError::Stale(Timestamp::from_millis(999)))
        );
        assert_eq!(
            dependent_phases(&t, &hover_at(999), &AFTER_REMOVAL_PHASES),
            Ok(AFTER_REMOVAL_PHASES.to_vec())
        );
    }

    #[test]
    fn resolved_phase_narrows_dependents() {
        let t = table(&[(100, 4)]);
        assert_eq!(
            dependent_phases(&t, &hover_at(100), &AFTER_REMOVAL_PHASES),
            Ok(vec![Phase::Stage4])
        );
    }
}
