use std::path::PathBuf;

use crate::data::datetime::Timestamp;
use crate::data::table::Phase;

/// Fatal errors raised while building the in-memory table.
#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("no data sources configured")]
    NoSources,
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("csv error in {source_name}: {source}")]
    Csv {
        source_name: String,
        #[source]
        source: csv::Error,
    },
    #[error("{source_name}: missing column \"{column}\"")]
    MissingColumn { source_name: String, column: String },
    #[error("{source_name} line {line}: cannot parse timestamp \"{value}\"")]
    TimestampParse {
        source_name: String,
        line: u64,
        value: String,
    },
    #[error("{source_name} line {line}: invalid phase \"{value}\"")]
    InvalidPhase {
        source_name: String,
        line: u64,
        value: String,
    },
    #[error("{source_name}: feature columns {found:?} do not match {expected:?}")]
    SchemaMismatch {
        source_name: String,
        expected: Vec<String>,
        found: Vec<String>,
    },
}

/// Failures of the hover reverse lookup.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum HoverError {
    #[error("hovered timestamp {0} is not present in the table")]
    Stale(Timestamp),
    #[error("timestamp {timestamp} maps to more than one phase: {phases:?}")]
    Ambiguous {
        timestamp: Timestamp,
        phases: Vec<Phase>,
    },
}

/// Rejected UI selections. Session state is left unchanged.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("unknown feature \"{0}\"")]
    UnknownFeature(String),
    #[error("unknown run {0}")]
    UnknownRun(u32),
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("feature \"{0}\" is not a column of the loaded data")]
    MissingFeature(String),
    #[error("run {0} is not among the loaded runs")]
    MissingRun(u32),
}

/// Errors surfaced while computing a dashboard view.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    #[error(transparent)]
    Selection(#[from] SelectionError),
    #[error(transparent)]
    Hover(#[from] HoverError),
}
