mod app;
mod ui;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use app::PhaseScopeApp;
use eframe::egui;
use phasescope::config::DashboardConfig;
use phasescope::data::loader;

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    // Optional first argument: path to the JSON config.
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = match DashboardConfig::resolve(config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let table = match loader::load(&config.sources, &config.load) {
        Ok(table) => table,
        Err(e) => {
            tracing::error!("Failed to load data: {e}");
            return ExitCode::FAILURE;
        }
    };
    if table.is_empty() {
        tracing::error!("No rows loaded from {} sources", config.sources.len());
        return ExitCode::FAILURE;
    }
    if let Err(e) = config.validate(&table) {
        tracing::error!("{e}");
        return ExitCode::FAILURE;
    }
    tracing::info!(
        "Loaded {} rows from {} runs",
        table.len(),
        table.run_labels().len()
    );
    let table = Arc::new(table);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("PhaseScope")
            .with_inner_size([1400.0, 1000.0])
            .with_min_inner_size([900.0, 600.0]),
        ..Default::default()
    };

    let result = eframe::run_native(
        "PhaseScope",
        options,
        Box::new(move |cc| Ok(Box::new(PhaseScopeApp::new(cc, table, &config)))),
    );
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Window closed with error: {e}");
            ExitCode::FAILURE
        }
    }
}
