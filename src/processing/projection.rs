use crate::data::table::FeatureId;
use crate::processing::phase_filter::PhaseGroup;
use crate::state::data_series::{PhaseColorMap, PhaseSeries, SeriesPoint};

/// Turn phase groups into renderable series: x is the row timestamp, y the
/// chosen feature. One series per group, in group order, rows kept in table
/// order.
pub fn project(
    groups: &[PhaseGroup<'_>],
    y: FeatureId,
    colors: &PhaseColorMap,
) -> Vec<PhaseSeries> {
    groups
        .iter()
        .map(|group| PhaseSeries {
            series_label: group.phase,
            points: group
                .rows
                .iter()
                .map(|row| SeriesPoint {
                    x: row.timestamp,
                    y: row.value(y),
                })
                .collect(),
            color: colors.color_of(group.phase).name.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::datetime::Timestamp;
    use crate::data::table::{Observation, Phase, RunLabel, Table};
    use crate::processing::phase_filter::filter_by_phase;

    fn table() -> Table {
        let rows = (0..6)
            .map(|i| Observation {
                timestamp: Timestamp::from_millis(i * 10),
                phase: if i % 2 == 0 { Phase::Stage1 } else { Phase::Stage3 },
                run_label: RunLabel(1),
                values: vec![i as f64, -(i as f64)],
            })
            .collect();
        Table::new("t".into(), vec!["a".into(), "b".into()], rows)
    }

    #[test]
    fn one_series_per_group_in_order() {
        let table = table();
        let groups = filter_by_phase(&table, &[Phase::Stage3, Phase::Stage2, Phase::Stage1], None);
        let b = table.feature("b").unwrap();
        let series = project(&groups, b, &PhaseColorMap::DEFAULT);

        let labels: Vec<Phase> = series.iter().map(|s| s.series_label).collect();
        assert_eq!(labels, vec![Phase::Stage3, Phase::Stage2, Phase::Stage1]);
        assert_eq!(series[0].color, "red");
        assert!(series[1].points.is_empty());

        let ys: Vec<f64> = series[0].points.iter().map(|p| p.y).collect();
        assert_eq!(ys, vec![-1.0, -3.0, -5.0]);
        assert!(series[2].points.windows(2).all(|w| w[0].x <= w[1].x));
    }
}
