use std::io::Read;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::data::datetime::Timestamp;
use crate::data::table::{Observation, Phase, RunLabel, Table};
use crate::error::LoadError;

/// One test log and the run label its rows are tagged with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSource {
    pub path: PathBuf,
    pub run_label: RunLabel,
}

/// Column names and decimation policy shared by every source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    pub timestamp_column: String,
    pub phase_column: String,
    /// Keep every `stride`-th row of each source (rows 0, stride, 2*stride, ...).
    pub stride: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            timestamp_column: "Column 2".to_string(),
            phase_column: "Column 3".to_string(),
            stride: 3,
        }
    }
}

/// Rows of a single source after decimation.
pub struct LoadedRun {
    pub feature_columns: Vec<String>,
    pub rows: Vec<Observation>,
    /// Row count before decimation.
    pub source_rows: usize,
}

/// Load every source and concatenate them in the given order.
/// Any parse failure aborts the whole load.
pub fn load(sources: &[RunSource], options: &LoadOptions) -> Result<Table, LoadError> {
    if sources.is_empty() {
        return Err(LoadError::NoSources);
    }

    let mut feature_columns: Option<Vec<String>> = None;
    let mut rows = Vec::new();

    for source in sources {
        let run = load_file(&source.path, source.run_label, options)?;
        tracing::info!(
            "Loaded run {} from {:?}: kept {} of {} rows",
            source.run_label,
            source.path,
            run.rows.len(),
            run.source_rows
        );
        match &feature_columns {
            Some(expected) if *expected != run.feature_columns => {
                return Err(LoadError::SchemaMismatch {
                    source_name: source.path.display().to_string(),
                    expected: expected.clone(),
                    found: run.feature_columns,
                });
            }
            Some(_) => {}
            None => feature_columns = Some(run.feature_columns),
        }
        rows.extend(run.rows);
    }

    Ok(Table::new(
        options.timestamp_column.clone(),
        feature_columns.unwrap_or_default(),
        rows,
    ))
}

/// Read a CSV log from disk. Falls back to latin1 when the file is not UTF-8.
pub fn load_file(
    path: &Path,
    run_label: RunLabel,
    options: &LoadOptions,
) -> Result<LoadedRun, LoadError> {
    let content = std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let text = match String::from_utf8(content) {
        Ok(text) => text,
        Err(e) => e.into_bytes().iter().map(|&b| b as char).collect(),
    };
    load_reader(
        text.as_bytes(),
        &path.display().to_string(),
        run_label,
        options,
    )
}

/// Parse one CSV log from any reader. `source_name` only appears in errors
/// and logs.
pub fn load_reader<R: Read>(
    reader: R,
    source_name: &str,
    run_label: RunLabel,
    options: &LoadOptions,
) -> Result<LoadedRun, LoadError> {
    let csv_err = |source| LoadError::Csv {
        source_name: source_name.to_string(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b',')
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(|s| s.trim().to_string())
        .collect();

    let column_index = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| LoadError::MissingColumn {
                source_name: source_name.to_string(),
                column: name.to_string(),
            })
    };
    let ts_idx = column_index(&options.timestamp_column)?;
    let phase_idx = column_index(&options.phase_column)?;

    let feature_indices: Vec<usize> = (0..headers.len())
        .filter(|&i| i != ts_idx && i != phase_idx)
        .collect();
    let feature_columns: Vec<String> =
        feature_indices.iter().map(|&i| headers[i].clone()).collect();

    let stride = options.stride.max(1);
    let mut rows = Vec::new();
    let mut source_rows = 0usize;
    let mut previous: Option<Timestamp> = None;
    let mut out_of_order = false;

    for (i, record) in reader.records().enumerate() {
        let record = record.map_err(csv_err)?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        source_rows += 1;

        let raw_ts = record.get(ts_idx).unwrap_or("");
        let timestamp =
            Timestamp::parse_source(raw_ts).ok_or_else(|| LoadError::TimestampParse {
                source_name: source_name.to_string(),
                line,
                value: raw_ts.to_string(),
            })?;

        if previous.is_some_and(|p| timestamp < p) {
            out_of_order = true;
        }
        previous = Some(timestamp);

        if i % stride != 0 {
            continue;
        }

        let raw_phase = record.get(phase_idx).unwrap_or("");
        let phase = Phase::parse_cell(raw_phase).ok_or_else(|| LoadError::InvalidPhase {
            source_name: source_name.to_string(),
            line,
            value: raw_phase.to_string(),
        })?;

        let values = feature_indices
            .iter()
            .map(|&c| {
                record
                    .get(c)
                    .and_then(|s| s.trim().parse::<f64>().ok())
                    .unwrap_or(f64::NAN)
            })
            .collect();

        rows.push(Observation {
            timestamp,
            phase,
            run_label,
            values,
        });
    }

    if out_of_order {
        tracing::warn!("{source_name}: timestamps are not in chronological order");
    }

    Ok(LoadedRun {
        feature_columns,
        rows,
        source_rows,
    })
}
