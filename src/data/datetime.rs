use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Format of the timestamp column in the rig's CSV logs,
/// e.g. `Tue 05/29/18 10:15:23.123456 AM`.
pub const SOURCE_FORMAT: &str = "%a %m/%d/%y %I:%M:%S%.f %p";

/// Display format handed to the rendering surface. Six fractional digits, so
/// every source timestamp survives the trip through a hover event.
pub const DISPLAY_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Formats accepted back from the rendering surface (hover events).
const DISPLAY_PARSE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
];

/// Canonical timestamp: microseconds since the Unix epoch.
///
/// Source times carry no zone and are interpreted as UTC, so formatting and
/// parsing through [`Timestamp::to_display`] / [`Timestamp::parse_display`]
/// round-trips exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(i64);

impl Timestamp {
    pub const fn from_micros(us: i64) -> Self {
        Self(us)
    }

    pub const fn from_millis(ms: i64) -> Self {
        Self(ms * 1_000)
    }

    /// Parse a value from the log's timestamp column. The fractional seconds
    /// are mandatory; `%.f` alone would accept `10:15:23 AM`.
    pub fn parse_source(value: &str) -> Option<Self> {
        let value = value.trim();
        let time = value.split_whitespace().nth(2)?;
        if !time.contains('.') {
            return None;
        }
        NaiveDateTime::parse_from_str(value, SOURCE_FORMAT)
            .ok()
            .map(|dt| Self(dt.and_utc().timestamp_micros()))
    }

    /// Parse a timestamp string coming back from a chart.
    /// Accepts RFC 3339 (with zone) as well as naive ISO-8601.
    pub fn parse_display(value: &str) -> Option<Self> {
        let value = value.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
            return Some(Self(dt.timestamp_micros()));
        }
        DISPLAY_PARSE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
            .map(|dt| Self(dt.and_utc().timestamp_micros()))
    }

    pub fn to_display(self) -> String {
        match DateTime::<Utc>::from_timestamp_micros(self.0) {
            Some(dt) => dt.format(DISPLAY_FORMAT).to_string(),
            None => self.0.to_string(),
        }
    }

    /// Plot x coordinate: epoch milliseconds with the microseconds as fraction.
    /// Drawing only; lookups go through the timestamp itself.
    pub fn as_plot_x(self) -> f64 {
        self.0 as f64 / 1_000.0
    }

    pub fn from_plot_x(x: f64) -> Self {
        Self((x * 1_000.0).round() as i64)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_display())
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_display())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Timestamp::parse_display(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp \"{s}\"")))
    }
}

/// Short axis tick label for a plot x coordinate (epoch milliseconds).
pub fn format_tick(x: f64, span_ms: f64) -> String {
    let Some(dt) = DateTime::<Utc>::from_timestamp_millis(x.round() as i64) else {
        return format!("{x:.0}");
    };
    if span_ms < 60_000.0 {
        dt.format("%H:%M:%S%.3f").to_string()
    } else if span_ms < 86_400_000.0 {
        dt.format("%H:%M:%S").to_string()
    } else {
        dt.format("%m/%d %H:%M").to_string()
    }
}
