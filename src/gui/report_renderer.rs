//! Report Renderer
//! Central scrollable page: title, full table, fatality metrics and chart panels.

use crate::charts::{ChartData, ChartPlotter};
use crate::data::CrashTable;
use crate::stats::SummaryMetrics;
use egui::{Color32, RichText, ScrollArea};
use polars::prelude::AnyValue;

pub const TITLE: &str = "Air Crashes app from 1952 to Date";

const TABLE_HEIGHT: f32 = 320.0;
const TABLE_ROW_HEIGHT: f32 = 20.0;
const SECTION_SPACING: f32 = 18.0;

/// Presents one report. Holds only what was computed for the current table.
#[derive(Default)]
pub struct ReportRenderer {
    pub summary: SummaryMetrics,
    pub charts: Vec<ChartData>,
}

impl ReportRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_report(&mut self, summary: SummaryMetrics, charts: Vec<ChartData>) {
        self.summary = summary;
        self.charts = charts;
    }

    /// Clear all charts
    pub fn clear(&mut self) {
        self.summary = SummaryMetrics::default();
        self.charts.clear();
    }

    /// Draw the whole page for `table`.
    pub fn show(&self, ui: &mut egui::Ui, table: &CrashTable) {
        ScrollArea::vertical()
            .id_salt("report_page")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.heading(RichText::new(TITLE).size(26.0).strong());
                ui.add_space(SECTION_SPACING);

                Self::draw_table(ui, table);
                ui.add_space(SECTION_SPACING);

                ui.label(RichText::new("Number of Fatalities").size(20.0).strong());
                ui.add_space(8.0);
                self.draw_metrics(ui);
                ui.add_space(SECTION_SPACING);

                for chart in &self.charts {
                    Self::draw_chart_card(ui, chart);
                    ui.add_space(SECTION_SPACING);
                }
            });
    }

    /// Error page shown when the table could not be loaded.
    pub fn show_error(ui: &mut egui::Ui, message: &str) {
        ui.vertical_centered(|ui| {
            ui.add_space(60.0);
            ui.heading(RichText::new(TITLE).size(26.0).strong());
            ui.add_space(20.0);
            ui.label(
                RichText::new(message)
                    .size(16.0)
                    .color(Color32::from_rgb(220, 53, 69)),
            );
            ui.add_space(8.0);
            ui.label(
                RichText::new("Use Reload or Browse in the sidebar once the file is available.")
                    .color(Color32::GRAY),
            );
        });
    }

    /// Full cleaned table, virtualized so only visible rows are formatted.
    fn draw_table(ui: &mut egui::Ui, table: &CrashTable) {
        let df = table.dataframe();
        let columns = df.get_columns();
        let names = table.column_names();

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ScrollArea::both()
                    .id_salt("crash_table")
                    .max_height(TABLE_HEIGHT)
                    .auto_shrink([false, true])
                    .show_rows(ui, TABLE_ROW_HEIGHT, df.height() + 1, |ui, row_range| {
                        egui::Grid::new("crash_table_grid")
                            .striped(true)
                            .min_col_width(60.0)
                            .spacing([12.0, 4.0])
                            .show(ui, |ui| {
                                for row in row_range {
                                    if row == 0 {
                                        for name in &names {
                                            ui.label(RichText::new(name).strong().size(12.0));
                                        }
                                    } else {
                                        for column in columns {
                                            let text = column
                                                .get(row - 1)
                                                .map(cell_text)
                                                .unwrap_or_default();
                                            ui.label(RichText::new(text).size(12.0));
                                        }
                                    }
                                    ui.end_row();
                                }
                            });
                    });
            });

        ui.label(
            RichText::new(format!("{} rows x {} columns", df.height(), df.width()))
                .size(11.0)
                .color(Color32::GRAY),
        );
    }

    fn draw_metrics(&self, ui: &mut egui::Ui) {
        ui.columns(3, |cols| {
            Self::draw_metric(&mut cols[0], "Fatalities on Ground", self.summary.ground);
            Self::draw_metric(&mut cols[1], "Total Fatalities", self.summary.total);
            Self::draw_metric(&mut cols[2], "Fatalities in Air", self.summary.air);
        });
    }

    fn draw_metric(ui: &mut egui::Ui, label: &str, value: i64) {
        ui.vertical(|ui| {
            ui.label(RichText::new(label).size(13.0).color(Color32::GRAY));
            ui.label(RichText::new(value.to_string()).size(30.0).strong());
        });
    }

    fn draw_chart_card(ui: &mut egui::Ui, chart: &ChartData) {
        ui.label(RichText::new(chart.heading).size(20.0).strong());
        ui.add_space(6.0);

        egui::Frame::none()
            .rounding(8.0)
            .stroke(egui::Stroke::new(1.0, ui.visuals().widgets.noninteractive.bg_stroke.color))
            .inner_margin(12.0)
            .show(ui, |ui| {
                if let Some(title) = chart.title {
                    ui.vertical_centered(|ui| {
                        ui.label(RichText::new(title).size(15.0).strong());
                    });
                }
                if chart.plottable().is_empty() {
                    ui.label(RichText::new("No data points").color(Color32::GRAY));
                }
                ChartPlotter::draw_chart(ui, chart);
            });
    }
}

/// Text of one table cell. Strings are shown as stored, without `Display` quoting.
fn cell_text(value: AnyValue) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_cells_are_shown_verbatim() {
        assert_eq!(cell_text(AnyValue::String("Douglas DC-3")), "Douglas DC-3");
        assert_eq!(cell_text(AnyValue::String("Model \"B\"")), "Model \"B\"");
        assert_eq!(cell_text(AnyValue::Int64(1952)), "1952");
        assert_eq!(cell_text(AnyValue::Null), "");
    }
}
