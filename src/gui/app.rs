//! Dashboard Main Application
//! Main window with the filter sidebar and the report page.

use crate::charts::{ChartData, StaticChartRenderer};
use crate::config::DashboardConfig;
use crate::data::{CrashTable, DataLoader};
use crate::gui::{ControlPanel, ControlPanelAction, ReportRenderer};
use crate::stats::Report;
use anyhow::Context;
use egui::SidePanel;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Main application window.
///
/// The table is an explicit value owned here. It is only rebuilt by
/// [`DashboardApp::reload`]; nothing else re-reads the source file.
pub struct DashboardApp {
    config: DashboardConfig,
    loader: DataLoader,
    table: Option<CrashTable>,
    load_error: Option<String>,
    control_panel: ControlPanel,
    report_renderer: ReportRenderer,
}

impl DashboardApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        config: DashboardConfig,
        startup_warning: Option<String>,
    ) -> Self {
        let mut app = Self {
            loader: DataLoader::new(config.data_path.clone()),
            config,
            table: None,
            load_error: None,
            control_panel: ControlPanel::new(),
            report_renderer: ReportRenderer::new(),
        };
        app.reload();

        if let Some(warning) = startup_warning {
            app.control_panel.set_status(format!("Error: {}", warning));
        }
        app
    }

    /// Load the table from the current path and rebuild the report.
    pub fn reload(&mut self) {
        match self.loader.load() {
            Ok(table) => {
                let report = Report::build(&table, self.config.top_n);
                let charts = ChartData::from_report(&report);

                self.control_panel.update_years(table.years());
                self.control_panel.total_rows = table.height();
                self.control_panel.export_enabled = true;
                self.control_panel.set_status(format!(
                    "Loaded {} rows, {} columns",
                    table.height(),
                    table.dataframe().width()
                ));
                self.report_renderer.set_report(report.summary, charts);
                self.load_error = None;
                self.table = Some(table);
                self.apply_year_filter();
            }
            Err(e) => {
                let message = format!("Failed to load {}: {}", self.loader.file_path().display(), e);
                self.control_panel.update_years(Vec::new());
                self.control_panel.total_rows = 0;
                self.control_panel.filtered_rows = 0;
                self.control_panel.export_enabled = false;
                self.control_panel.set_status(format!("Error: {}", e));
                self.report_renderer.clear();
                self.load_error = Some(message);
                self.table = None;
            }
        }
    }

    /// Recompute the filtered table for the current year selection.
    ///
    /// Only the row count surfaces in the sidebar; the report keeps reading
    /// the full table.
    fn apply_year_filter(&mut self) {
        let Some(table) = &self.table else {
            return;
        };

        match table.filter_years(&self.control_panel.selected_years) {
            Ok(filtered) => {
                debug!(
                    years = self.control_panel.selected_years.len(),
                    rows = filtered.height(),
                    "year filter applied"
                );
                self.control_panel.filtered_rows = filtered.height();
            }
            Err(e) => {
                warn!("year filter failed: {}", e);
                self.control_panel.set_status(format!("Error: {}", e));
            }
        }
    }

    /// Handle CSV file selection
    fn handle_browse_csv(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        {
            info!(path = %path.display(), "switching data source");
            self.loader.set_file_path(path);
            self.reload();
        }
    }

    fn handle_export(&mut self, ask_for_folder: bool) {
        let dir = if ask_for_folder {
            match rfd::FileDialog::new()
                .set_directory(&self.config.export_dir)
                .pick_folder()
            {
                Some(dir) => dir,
                None => return, // User cancelled
            }
        } else {
            self.config.export_dir.clone()
        };

        match self.export_charts(&dir) {
            Ok(count) => self
                .control_panel
                .set_status(format!("Exported {} charts to {}", count, dir.display())),
            Err(e) => {
                error!("export failed: {:#}", e);
                self.control_panel.set_status(format!("Error: {:#}", e));
            }
        }
    }

    fn export_charts(&self, dir: &Path) -> anyhow::Result<usize> {
        let paths: Vec<PathBuf> =
            StaticChartRenderer::render_all(&self.report_renderer.charts, dir)
                .with_context(|| format!("rendering charts into {}", dir.display()))?;

        if let Err(e) = open::that(dir) {
            warn!(dir = %dir.display(), "could not open export folder: {}", e);
        }
        Ok(paths.len())
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(240.0)
            .max_width(300.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui, self.loader.file_path());

                    match action {
                        ControlPanelAction::Reload => self.reload(),
                        ControlPanelAction::BrowseCsv => self.handle_browse_csv(),
                        ControlPanelAction::SelectionChanged => self.apply_year_filter(),
                        ControlPanelAction::ExportCharts => self.handle_export(false),
                        ControlPanelAction::ExportChartsTo => self.handle_export(true),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Report
        egui::CentralPanel::default().show(ctx, |ui| match (&self.table, &self.load_error) {
            (Some(table), _) => self.report_renderer.show(ui, table),
            (None, Some(message)) => ReportRenderer::show_error(ui, message),
            (None, None) => {
                ui.centered_and_justified(|ui| {
                    ui.label("No Data");
                });
            }
        });
    }
}
