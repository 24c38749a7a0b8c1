use crate::data::table::{Observation, Phase, RunLabel, Table};

/// Rows of one phase, borrowed from the table in table order.
#[derive(Debug, Clone)]
pub struct PhaseGroup<'a> {
    pub phase: Phase,
    pub rows: Vec<&'a Observation>,
}

/// Split `table` into one group per requested phase, in the caller's order.
///
/// A phase with no matching rows still gets an (empty) group so charts keep
/// its legend entry. When `run` is given only that run's rows are kept.
pub fn filter_by_phase<'a>(
    table: &'a Table,
    phases: &[Phase],
    run: Option<RunLabel>,
) -> Vec<PhaseGroup<'a>> {
    let mut groups: Vec<PhaseGroup<'a>> = phases
        .iter()
        .map(|&phase| PhaseGroup {
            phase,
            rows: Vec::new(),
        })
        .collect();

    for row in table.rows() {
        if run.is_some_and(|r| r != row.run_label) {
            continue;
        }
        // A phase listed twice fills both groups.
        for group in groups.iter_mut().filter(|g| g.phase == row.phase) {
            group.rows.push(row);
        }
    }

    groups
}
