use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::data::loader::{LoadOptions, RunSource};
use crate::data::table::{RunLabel, Table};
use crate::error::ConfigError;
use crate::state::selection::{HoverResetPolicy, Selection};
use crate::state::view::ViewMode;

pub const DEFAULT_CONFIG_FILE: &str = "phasescope.json";

/// Dashboard configuration, read from a JSON file. Missing keys take the
/// values of [`DashboardConfig::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub sources: Vec<RunSource>,
    #[serde(flatten)]
    pub load: LoadOptions,
    /// Feature plotted on the outlier chart.
    pub target_feature: String,
    /// Features offered by the left/right dropdowns.
    pub features: Vec<String>,
    pub initial: Selection,
    pub hover_reset: HoverResetPolicy,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        let sources = [("0529test1.csv", 1), ("0529test3.csv", 2), ("0530test4.csv", 3)]
            .into_iter()
            .map(|(path, run)| RunSource {
                path: PathBuf::from(path),
                run_label: RunLabel(run),
            })
            .collect();
        let features = [1, 4, 5, 6, 7, 8, 9, 10, 11, 12]
            .into_iter()
            .map(|n| format!("Column {n}"))
            .collect();
        Self {
            sources,
            load: LoadOptions::default(),
            target_feature: "Column 12".to_string(),
            features,
            initial: Selection {
                run_label: RunLabel(2),
                left_feature: "Column 4".to_string(),
                right_feature: "Column 12".to_string(),
                view_mode: ViewMode::Original,
            },
            hover_reset: HoverResetPolicy::Keep,
        }
    }
}

impl DashboardConfig {
    /// Read a config file. Relative source paths are taken relative to the
    /// file's directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: DashboardConfig =
            serde_json::from_str(&text).map_err(|source| ConfigError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        if let Some(base) = path.parent() {
            for source in &mut config.sources {
                if source.path.is_relative() {
                    source.path = base.join(&source.path);
                }
            }
        }
        Ok(config)
    }

    /// Use `path` when given. Otherwise read the default file if present and
    /// fall back to built-in defaults.
    pub fn resolve(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::load(default_path)
                } else {
                    tracing::info!("No {DEFAULT_CONFIG_FILE} found, using built-in defaults");
                    Ok(Self::default())
                }
            }
        }
    }

    /// Check the configured columns and run against the loaded table.
    pub fn validate(&self, table: &Table) -> Result<(), ConfigError> {
        let names = std::iter::once(&self.target_feature)
            .chain(&self.features)
            .chain([&self.initial.left_feature, &self.initial.right_feature]);
        for name in names {
            table
                .feature(name)
                .map_err(|_| ConfigError::MissingFeature(name.clone()))?;
        }
        for name in [&self.initial.left_feature, &self.initial.right_feature] {
            if !self.features.contains(name) {
                return Err(ConfigError::MissingFeature(name.clone()));
            }
        }
        if !table.has_run(self.initial.run_label) {
            return Err(ConfigError::MissingRun(self.initial.run_label.0));
        }
        Ok(())
    }
}
