//! Control Panel Widget
//! Left sidebar: data source, year filter and chart export.

use egui::{Color32, RichText, ScrollArea};
use std::collections::BTreeSet;
use std::path::Path;

/// Sidebar with the year multi-select and data/export controls.
pub struct ControlPanel {
    /// Every distinct year of the loaded table, ascending.
    pub years: Vec<i64>,
    /// Currently selected years (default: all of them).
    pub selected_years: BTreeSet<i64>,
    /// Rows of the table that fall in the selection.
    pub filtered_rows: usize,
    pub total_rows: usize,
    pub status: String,
    pub export_enabled: bool,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            years: Vec::new(),
            selected_years: BTreeSet::new(),
            filtered_rows: 0,
            total_rows: 0,
            status: "Ready".to_string(),
            export_enabled: false,
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update available years after a (re)load; everything starts selected.
    pub fn update_years(&mut self, years: Vec<i64>) {
        self.selected_years = years.iter().copied().collect();
        self.years = years;
    }

    pub fn select_all(&mut self) {
        self.selected_years = self.years.iter().copied().collect();
    }

    pub fn clear_selection(&mut self) {
        self.selected_years.clear();
    }

    /// Toggle one year; returns whether it is now selected.
    pub fn toggle_year(&mut self, year: i64) -> bool {
        if self.selected_years.remove(&year) {
            false
        } else {
            self.selected_years.insert(year);
            true
        }
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui, data_path: &Path) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // ===== Data Source Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                let file_name = data_path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| data_path.display().to_string());
                ui.label(RichText::new(file_name).size(12.0))
                    .on_hover_text(data_path.display().to_string());

                ui.horizontal(|ui| {
                    if ui.button("🔄 Reload").clicked() {
                        action = ControlPanelAction::Reload;
                    }
                    if ui.button("📂 Browse").clicked() {
                        action = ControlPanelAction::BrowseCsv;
                    }
                });
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Filter Section =====
        ui.label(RichText::new("Filter Options").size(16.0).strong());
        ui.add_space(5.0);
        ui.label("Select Years");

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(5.0)
            .show(ui, |ui| {
                ScrollArea::vertical()
                    .id_salt("year_filter")
                    .max_height(260.0)
                    .show(ui, |ui| {
                        for i in 0..self.years.len() {
                            let year = self.years[i];
                            let mut checked = self.selected_years.contains(&year);
                            if ui.checkbox(&mut checked, year.to_string()).changed() {
                                self.toggle_year(year);
                                action = ControlPanelAction::SelectionChanged;
                            }
                        }
                    });
            });

        ui.add_space(5.0);
        ui.horizontal(|ui| {
            if ui.small_button("Select All").clicked() {
                self.select_all();
                action = ControlPanelAction::SelectionChanged;
            }
            if ui.small_button("Clear All").clicked() {
                self.clear_selection();
                action = ControlPanelAction::SelectionChanged;
            }
        });

        ui.add_space(5.0);
        ui.label(
            RichText::new(format!(
                "{} of {} years, {} of {} rows",
                self.selected_years.len(),
                self.years.len(),
                self.filtered_rows,
                self.total_rows
            ))
            .size(11.0)
            .color(Color32::GRAY),
        );

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Export Section =====
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(self.export_enabled, |ui| {
                let button = egui::Button::new(RichText::new("🖼 Export Charts").size(14.0))
                    .min_size(egui::vec2(180.0, 30.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::ExportCharts;
                }
                if ui.small_button("Export to folder…").clicked() {
                    action = ControlPanelAction::ExportChartsTo;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.contains("Exported") || self.status.contains("Loaded") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    /// Set status line
    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    Reload,
    BrowseCsv,
    SelectionChanged,
    ExportCharts,
    ExportChartsTo,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_years_start_fully_selected() {
        let mut panel = ControlPanel::new();
        panel.update_years(vec![1950, 1951, 1952]);
        assert_eq!(panel.selected_years.len(), 3);
    }

    #[test]
    fn toggle_and_clear() {
        let mut panel = ControlPanel::new();
        panel.update_years(vec![1950, 1951]);

        assert!(!panel.toggle_year(1950));
        assert!(!panel.selected_years.contains(&1950));
        assert!(panel.toggle_year(1950));

        panel.clear_selection();
        assert!(panel.selected_years.is_empty());
        panel.select_all();
        assert_eq!(panel.selected_years.len(), 2);
    }
}
