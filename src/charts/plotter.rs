//! Chart Plotter Module
//! Turns a report into chart series and draws them with egui_plot.

use crate::stats::Report;
use egui::Color32;
use egui_plot::{Bar, BarChart, GridMark, Line, Plot, PlotPoints, Points};

/// Height of one interactive chart.
pub const CHART_HEIGHT: f32 = 320.0;

/// Line color (matplotlib default blue)
pub const LINE_COLOR: [u8; 3] = [31, 119, 180];
pub const AIRCRAFT_COLOR: [u8; 3] = [220, 53, 69]; // Red
pub const REGION_COLOR: [u8; 3] = [52, 152, 219]; // Blue

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    /// Connected line with visible markers
    Line,
    /// Categories along x, bars in the given order
    VerticalBars,
    /// Categories along y, first category on top
    HorizontalBars,
}

/// One plotted value. For bar charts `x` is the rank.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub label: String,
    pub x: f64,
    pub y: f64,
}

/// Everything needed to draw one chart panel, independent of the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    /// Stable id, also the exported file stem.
    pub id: &'static str,
    pub heading: &'static str,
    pub title: Option<&'static str>,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub kind: ChartKind,
    pub color: [u8; 3],
    pub points: Vec<ChartPoint>,
}

impl ChartData {
    /// The five chart panels of the dashboard, in display order.
    pub fn from_report(report: &Report) -> Vec<ChartData> {
        vec![
            ChartData {
                id: "crashes_per_year",
                heading: "Crashes per Year",
                title: None,
                x_label: "Year",
                y_label: "Number of Crashes",
                kind: ChartKind::Line,
                color: LINE_COLOR,
                points: numeric_points(
                    report
                        .crashes_per_year
                        .iter()
                        .map(|&(year, n)| (year as f64, n as f64)),
                ),
            },
            ChartData {
                id: "crashes_per_aircraft",
                heading: "Crashes per Aircraft Type",
                title: None,
                x_label: "Aircraft Type",
                y_label: "Number of Crashes",
                kind: ChartKind::VerticalBars,
                color: AIRCRAFT_COLOR,
                points: ranked_points(&report.crashes_per_aircraft),
            },
            ChartData {
                id: "crashes_per_region",
                heading: "Crashes per Country",
                title: None,
                x_label: "Number of Crashes",
                y_label: "Region",
                kind: ChartKind::HorizontalBars,
                color: REGION_COLOR,
                points: ranked_points(&report.crashes_per_region),
            },
            ChartData {
                id: "fatalities_by_month",
                heading: "Fatalities by Month",
                title: Some("Total Fatalities Grouped by Month"),
                x_label: "Month",
                y_label: "Total Fatalities",
                kind: ChartKind::Line,
                color: LINE_COLOR,
                points: numeric_points(
                    report
                        .fatalities_by_month
                        .iter()
                        .map(|&(month, total)| (month as f64, total as f64)),
                ),
            },
            ChartData {
                id: "survivor_rate_by_year",
                heading: "Survivor Rate by Year",
                title: None,
                x_label: "Year",
                y_label: "Survivor Rate",
                kind: ChartKind::Line,
                color: LINE_COLOR,
                points: numeric_points(
                    report
                        .survivor_rate_by_year
                        .iter()
                        .map(|&(year, rate)| (year as f64, rate)),
                ),
            },
        ]
    }

    /// Points with a finite value; NaN/inf aggregates are not drawn.
    pub fn plottable(&self) -> Vec<&ChartPoint> {
        self.points.iter().filter(|p| p.y.is_finite()).collect()
    }

    pub fn color32(&self) -> Color32 {
        let [r, g, b] = self.color;
        Color32::from_rgb(r, g, b)
    }
}

fn numeric_points(values: impl Iterator<Item = (f64, f64)>) -> Vec<ChartPoint> {
    values
        .map(|(x, y)| ChartPoint {
            label: format!("{}", x),
            x,
            y,
        })
        .collect()
}

fn ranked_points(counts: &[(String, usize)]) -> Vec<ChartPoint> {
    counts
        .iter()
        .enumerate()
        .map(|(rank, (label, n))| ChartPoint {
            label: label.clone(),
            x: rank as f64,
            y: *n as f64,
        })
        .collect()
}

/// One grid mark per category slot.
fn category_marks(count: usize) -> Vec<GridMark> {
    (0..count)
        .map(|i| GridMark {
            value: i as f64,
            step_size: 1.0,
        })
        .collect()
}

/// Label of the category at `value`, empty between slots.
fn category_label(labels: &[String], value: f64) -> String {
    let idx = value.round();
    if (value - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}

/// Draws chart panels with egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    pub fn draw_chart(ui: &mut egui::Ui, chart: &ChartData) {
        match chart.kind {
            ChartKind::Line => Self::draw_line_chart(ui, chart),
            ChartKind::VerticalBars => Self::draw_vertical_bars(ui, chart),
            ChartKind::HorizontalBars => Self::draw_horizontal_bars(ui, chart),
        }
    }

    fn draw_line_chart(ui: &mut egui::Ui, chart: &ChartData) {
        let points = chart.plottable();
        let color = chart.color32();

        Plot::new(chart.id)
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .x_axis_label(chart.x_label)
            .y_axis_label(chart.y_label)
            .show(ui, |plot_ui| {
                let line_points: PlotPoints = points.iter().map(|p| [p.x, p.y]).collect();
                plot_ui.line(
                    Line::new(line_points)
                        .color(color)
                        .width(2.0)
                        .name(chart.y_label),
                );

                let markers: PlotPoints = points.iter().map(|p| [p.x, p.y]).collect();
                plot_ui.points(Points::new(markers).radius(4.0).color(color));
            });
    }

    fn draw_vertical_bars(ui: &mut egui::Ui, chart: &ChartData) {
        let points = chart.plottable();
        let color = chart.color32();
        let labels: Vec<String> = points.iter().map(|p| p.label.clone()).collect();
        let count = labels.len();

        let bars: Vec<Bar> = points
            .iter()
            .map(|p| Bar::new(p.x, p.y).name(&p.label).width(0.7).fill(color))
            .collect();

        Plot::new(chart.id)
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .x_axis_label(chart.x_label)
            .y_axis_label(chart.y_label)
            .include_y(0.0)
            .x_grid_spacer(move |_input| category_marks(count))
            .x_axis_formatter(move |mark, _range| category_label(&labels, mark.value))
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).color(color).name(chart.y_label));
            });
    }

    fn draw_horizontal_bars(ui: &mut egui::Ui, chart: &ChartData) {
        let points = chart.plottable();
        let color = chart.color32();
        let count = points.len();

        // First (largest) category sits at the top slot.
        let labels: Vec<String> = points.iter().rev().map(|p| p.label.clone()).collect();
        let bars: Vec<Bar> = points
            .iter()
            .enumerate()
            .map(|(rank, p)| {
                Bar::new((count - 1 - rank) as f64, p.y)
                    .name(&p.label)
                    .width(0.7)
                    .fill(color)
            })
            .collect();

        Plot::new(chart.id)
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .x_axis_label(chart.x_label)
            .y_axis_label(chart.y_label)
            .include_x(0.0)
            .y_grid_spacer(move |_input| category_marks(count))
            .y_axis_formatter(move |mark, _range| category_label(&labels, mark.value))
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(
                    BarChart::new(bars)
                        .color(color)
                        .horizontal()
                        .name(chart.x_label),
                );
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::SummaryMetrics;

    fn report() -> Report {
        Report {
            summary: SummaryMetrics::default(),
            crashes_per_year: vec![(1950, 2), (1951, 1)],
            crashes_per_aircraft: vec![("X".into(), 5), ("Y".into(), 2)],
            crashes_per_region: vec![("A".into(), 3)],
            fatalities_by_month: vec![(1, 10), (2, 4)],
            survivor_rate_by_year: vec![(1950, 75.0), (1951, f64::NAN)],
        }
    }

    #[test]
    fn one_panel_per_view() {
        let charts = ChartData::from_report(&report());
        let kinds: Vec<ChartKind> = charts.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ChartKind::Line,
                ChartKind::VerticalBars,
                ChartKind::HorizontalBars,
                ChartKind::Line,
                ChartKind::Line,
            ]
        );
    }

    #[test]
    fn bars_keep_ranking_order() {
        let charts = ChartData::from_report(&report());
        let aircraft = &charts[1];
        assert_eq!(aircraft.points[0].label, "X");
        assert_eq!(aircraft.points[0].x, 0.0);
        assert_eq!(aircraft.points[1].y, 2.0);
    }

    #[test]
    fn non_finite_values_are_not_plotted() {
        let charts = ChartData::from_report(&report());
        let survivor = &charts[4];
        assert_eq!(survivor.points.len(), 2);
        assert_eq!(survivor.plottable().len(), 1);
    }

    #[test]
    fn category_labels_only_on_slots() {
        let labels = vec!["a".to_string(), "b".to_string()];
        assert_eq!(category_label(&labels, 1.0), "b");
        assert_eq!(category_label(&labels, 0.5), "");
        assert_eq!(category_label(&labels, 2.0), "");
        assert_eq!(category_label(&labels, -1.0), "");
    }
}
