//! Air Crash Dashboard - historical aircraft-accident explorer
//!
//! Loads the accident CSV once, derives Date and Survivor Rate, and shows
//! fatality metrics plus the crash/fatality charts with a year filter.

mod charts;
mod config;
mod data;
mod gui;
mod logging;
mod stats;

use config::{DashboardConfig, CONFIG_FILE_NAME};
use eframe::egui;
use gui::DashboardApp;
use std::path::Path;
use tracing::{info, warn};

fn main() -> eframe::Result<()> {
    logging::init_logging();

    let (config, startup_warning) = match DashboardConfig::load(Path::new(CONFIG_FILE_NAME)) {
        Ok(config) => (config, None),
        Err(e) => {
            warn!("{}; using defaults", e);
            (DashboardConfig::default(), Some(e.to_string()))
        }
    };
    info!(data_path = %config.data_path.display(), "starting dashboard");

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window_width, config.window_height])
            .with_min_inner_size([1000.0, 700.0])
            .with_title("Air Crash Dashboard"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Air Crash Dashboard",
        options,
        Box::new(move |cc| Ok(Box::new(DashboardApp::new(cc, config, startup_warning)))),
    )
}
