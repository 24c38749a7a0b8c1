use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::data::datetime::Timestamp;
use crate::error::SelectionError;

/// A labeled stage of a test run. `Baseline` is the short warm-up stage the
/// cleaned view drops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Phase {
    Baseline = 0,
    Stage1 = 1,
    Stage2 = 2,
    Stage3 = 3,
    Stage4 = 4,
}

impl Phase {
    pub const ALL: [Phase; 5] = [
        Phase::Baseline,
        Phase::Stage1,
        Phase::Stage2,
        Phase::Stage3,
        Phase::Stage4,
    ];

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn from_number(n: i64) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| i64::from(p.number()) == n)
    }

    /// Parse a phase cell. Integral floats such as `2.0` are accepted.
    pub fn parse_cell(value: &str) -> Option<Self> {
        let value = value.trim();
        if let Ok(n) = value.parse::<i64>() {
            return Self::from_number(n);
        }
        let f = value.parse::<f64>().ok()?;
        if f.fract() != 0.0 || !f.is_finite() {
            return None;
        }
        Self::from_number(f as i64)
    }
}

impl TryFrom<u8> for Phase {
    type Error = String;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        Phase::from_number(i64::from(n)).ok_or_else(|| format!("invalid phase {n}"))
    }
}

impl From<Phase> for u8 {
    fn from(p: Phase) -> u8 {
        p.number()
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// Identifies which ingested log a row came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunLabel(pub u32);

impl fmt::Display for RunLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Position of a feature column within [`Table::feature_columns`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FeatureId(pub(crate) usize);

#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub timestamp: Timestamp,
    pub phase: Phase,
    pub run_label: RunLabel,
    /// Positional against the owning table's feature columns. NaN marks a
    /// missing or non-numeric cell.
    pub values: Vec<f64>,
}

impl Observation {
    pub fn value(&self, feature: FeatureId) -> f64 {
        self.values.get(feature.0).copied().unwrap_or(f64::NAN)
    }
}

/// Read-only table of observations, run-major then file order.
#[derive(Debug, Clone)]
pub struct Table {
    timestamp_column: String,
    feature_columns: Vec<String>,
    rows: Vec<Observation>,
    by_timestamp: BTreeMap<Timestamp, Vec<usize>>,
}

impl Table {
    pub fn new(
        timestamp_column: String,
        feature_columns: Vec<String>,
        rows: Vec<Observation>,
    ) -> Self {
        let mut by_timestamp: BTreeMap<Timestamp, Vec<usize>> = BTreeMap::new();
        for (i, row) in rows.iter().enumerate() {
            by_timestamp.entry(row.timestamp).or_default().push(i);
        }
        Self {
            timestamp_column,
            feature_columns,
            rows,
            by_timestamp,
        }
    }

    pub fn rows(&self) -> &[Observation] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn timestamp_column(&self) -> &str {
        &self.timestamp_column
    }

    pub fn feature_columns(&self) -> &[String] {
        &self.feature_columns
    }

    pub fn feature(&self, name: &str) -> Result<FeatureId, SelectionError> {
        self.feature_columns
            .iter()
            .position(|c| c == name)
            .map(FeatureId)
            .ok_or_else(|| SelectionError::UnknownFeature(name.to_string()))
    }

    pub fn feature_name(&self, id: FeatureId) -> &str {
        self.feature_columns
            .get(id.0)
            .map(|s| s.as_str())
            .unwrap_or("")
    }

    /// Distinct run labels in ascending order.
    pub fn run_labels(&self) -> Vec<RunLabel> {
        self.rows
            .iter()
            .map(|r| r.run_label)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn has_run(&self, run: RunLabel) -> bool {
        self.rows.iter().any(|r| r.run_label == run)
    }

    /// All rows stored at exactly `ts`, in table order.
    pub fn rows_at(&self, ts: Timestamp) -> impl Iterator<Item = &Observation> {
        self.by_timestamp
            .get(&ts)
            .into_iter()
            .flatten()
            .map(move |&i| &self.rows[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(ms: i64, phase: Phase, run: u32) -> Observation {
        Observation {
            timestamp: Timestamp::from_millis(ms),
            phase,
            run_label: RunLabel(run),
            values: vec![ms as f64],
        }
    }

    #[test]
    fn phase_cells() {
        assert_eq!(Phase::parse_cell("3"), Some(Phase::Stage3));
        assert_eq!(Phase::parse_cell(" 2.0 "), Some(Phase::Stage2));
        assert_eq!(Phase::parse_cell("2.5"), None);
        assert_eq!(Phase::parse_cell("5"), None);
        assert_eq!(Phase::parse_cell("-1"), None);
    }

    #[test]
    fn phase_serializes_as_number() {
        assert_eq!(serde_json::to_string(&Phase::Stage4).unwrap(), "4");
        assert!(serde_json::from_str::<Phase>("7").is_err());
    }

    #[test]
    fn timestamp_index_finds_all_rows() {
        let table = Table::new(
            "t".into(),
            vec!["a".into()],
            vec![
                obs(10, Phase::Stage1, 1),
                obs(20, Phase::Stage1, 1),
                obs(10, Phase::Stage1, 2),
            ],
        );
        assert_eq!(table.rows_at(Timestamp::from_millis(10)).count(), 2);
        assert_eq!(table.rows_at(Timestamp::from_millis(15)).count(), 0);
        assert_eq!(table.run_labels(), vec![RunLabel(1), RunLabel(2)]);
    }

    #[test]
    fn unknown_feature_is_rejected() {
        let table = Table::new("t".into(), vec!["a".into()], Vec::new());
        assert!(table.is_empty());
        let a = table.feature("a").unwrap();
        assert_eq!(table.feature_name(a), "a");
        assert_eq!(
            table.feature("b"),
            Err(SelectionError::UnknownFeature("b".into()))
        );
    }
}
