//! Static Chart Renderer
//! Writes the dashboard charts as PNG figures with plotters.
//!
//! Each figure is 1200x600: heading as caption, axis descriptions, and
//! rotated category labels on the aircraft bar chart.

use crate::charts::{ChartData, ChartKind, ChartPoint};
use plotters::coord::ranged1d::SegmentValue;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontTransform;
use rayon::prelude::*;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

pub const FIGURE_WIDTH: u32 = 1200;
pub const FIGURE_HEIGHT: u32 = 600;

const FONT: &str = "sans-serif";

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to prepare export folder: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to draw {chart}: {message}")]
    Draw { chart: String, message: String },
}

impl RenderError {
    fn draw(chart: &ChartData, err: impl Display) -> Self {
        RenderError::Draw {
            chart: chart.id.to_string(),
            message: err.to_string(),
        }
    }
}

type DrawResult<DB> = Result<(), DrawingAreaErrorKind<<DB as DrawingBackend>::ErrorType>>;

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render every chart into `dir` as `<id>.png`, in parallel.
    pub fn render_all(charts: &[ChartData], dir: &Path) -> Result<Vec<PathBuf>, RenderError> {
        std::fs::create_dir_all(dir)?;

        let paths = charts
            .par_iter()
            .map(|chart| -> Result<PathBuf, RenderError> {
                let path = dir.join(format!("{}.png", chart.id));
                Self::render_png(chart, &path)?;
                debug!(path = %path.display(), "rendered figure");
                Ok(path)
            })
            .collect::<Result<Vec<_>, RenderError>>()?;

        info!(count = paths.len(), dir = %dir.display(), "exported charts");
        Ok(paths)
    }

    /// Render one chart to a PNG file.
    pub fn render_png(chart: &ChartData, path: &Path) -> Result<(), RenderError> {
        let root = BitMapBackend::new(path, (FIGURE_WIDTH, FIGURE_HEIGHT)).into_drawing_area();
        root.fill(&WHITE).map_err(|e| RenderError::draw(chart, e))?;

        Self::draw(&root, chart).map_err(|e| RenderError::draw(chart, e))?;

        root.present().map_err(|e| RenderError::draw(chart, e))?;
        Ok(())
    }

    /// Draw `chart` onto any plotters backend.
    pub fn draw<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        chart: &ChartData,
    ) -> DrawResult<DB> {
        let points = chart.plottable();
        match chart.kind {
            ChartKind::Line => Self::draw_line(root, chart, &points),
            ChartKind::VerticalBars => Self::draw_vertical_bars(root, chart, &points),
            ChartKind::HorizontalBars => Self::draw_horizontal_bars(root, chart, &points),
        }
    }

    fn caption(chart: &ChartData) -> &'static str {
        chart.title.unwrap_or(chart.heading)
    }

    fn rgb(chart: &ChartData) -> RGBColor {
        let [r, g, b] = chart.color;
        RGBColor(r, g, b)
    }

    fn draw_line<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        chart: &ChartData,
        points: &[&ChartPoint],
    ) -> DrawResult<DB> {
        let color = Self::rgb(chart);
        let (x_min, x_max) = padded_range(points.iter().map(|p| p.x), 0.02);
        let (y_min, y_max) = padded_range(points.iter().map(|p| p.y), 0.05);

        let mut ctx = ChartBuilder::on(root)
            .caption(Self::caption(chart), (FONT, 26))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(70)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

        ctx.configure_mesh()
            .x_desc(chart.x_label)
            .y_desc(chart.y_label)
            .x_label_formatter(&|v| format!("{:.0}", v))
            .draw()?;

        ctx.draw_series(LineSeries::new(
            points.iter().map(|p| (p.x, p.y)),
            color.stroke_width(2),
        ))?;
        ctx.draw_series(
            points
                .iter()
                .map(|p| Circle::new((p.x, p.y), 4, color.filled())),
        )?;

        Ok(())
    }

    fn draw_vertical_bars<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        chart: &ChartData,
        points: &[&ChartPoint],
    ) -> DrawResult<DB> {
        let color = Self::rgb(chart);
        let slots = points.len().max(1);
        let labels: Vec<String> = points.iter().map(|p| p.label.clone()).collect();

        let mut ctx = ChartBuilder::on(root)
            .caption(Self::caption(chart), (FONT, 26))
            .margin(20)
            .x_label_area_size(180)
            .y_label_area_size(70)
            .build_cartesian_2d((0..slots).into_segmented(), 0.0..bar_ceiling(points))?;

        ctx.configure_mesh()
            .disable_x_mesh()
            .x_desc(chart.x_label)
            .y_desc(chart.y_label)
            .x_labels(slots)
            .x_label_style((FONT, 14).into_font().transform(FontTransform::Rotate90))
            .x_label_formatter(&|v| segment_label(&labels, v))
            .draw()?;

        ctx.draw_series(
            Histogram::vertical(&ctx)
                .style(color.filled())
                .margin(10)
                .data(points.iter().enumerate().map(|(i, p)| (i, p.y))),
        )?;

        Ok(())
    }

    fn draw_horizontal_bars<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        chart: &ChartData,
        points: &[&ChartPoint],
    ) -> DrawResult<DB> {
        let color = Self::rgb(chart);
        let slots = points.len().max(1);

        // Slot 0 is the bottom, so walk the ranking backwards to put the largest on top.
        let bottom_up: Vec<&ChartPoint> = points.iter().rev().copied().collect();
        let labels: Vec<String> = bottom_up.iter().map(|p| p.label.clone()).collect();

        let mut ctx = ChartBuilder::on(root)
            .caption(Self::caption(chart), (FONT, 26))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(200)
            .build_cartesian_2d(0.0..bar_ceiling(points), (0..slots).into_segmented())?;

        ctx.configure_mesh()
            .disable_y_mesh()
            .x_desc(chart.x_label)
            .y_desc(chart.y_label)
            .y_labels(slots)
            .y_label_formatter(&|v| segment_label(&labels, v))
            .draw()?;

        ctx.draw_series(
            Histogram::horizontal(&ctx)
                .style(color.filled())
                .margin(10)
                .data(bottom_up.iter().enumerate().map(|(i, p)| (i, p.y))),
        )?;

        Ok(())
    }
}

/// Axis range covering `values` with `frac` padding on each side.
/// A single value (or none) still yields a drawable range.
fn padded_range(values: impl Iterator<Item = f64>, frac: f64) -> (f64, f64) {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });

    if min > max {
        return (0.0, 1.0);
    }
    if min == max {
        return (min - 1.0, max + 1.0);
    }
    let pad = (max - min) * frac;
    (min - pad, max + pad)
}

/// Upper bound of the value axis of a bar chart.
fn bar_ceiling(points: &[&ChartPoint]) -> f64 {
    let max = points.iter().map(|p| p.y).fold(0.0, f64::max);
    if max > 0.0 {
        max * 1.1
    } else {
        1.0
    }
}

fn segment_label(labels: &[String], value: &SegmentValue<usize>) -> String {
    match value {
        SegmentValue::Exact(i) | SegmentValue::CenterOf(i) => {
            labels.get(*i).cloned().unwrap_or_default()
        }
        SegmentValue::Last => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{Report, SummaryMetrics};

    fn chart_with(kind: ChartKind, values: &[(&str, f64)]) -> ChartData {
        ChartData {
            id: "test_chart",
            heading: "Test Chart",
            title: None,
            x_label: "Key",
            y_label: "Value",
            kind,
            color: [31, 119, 180],
            points: values
                .iter()
                .enumerate()
                .map(|(i, (label, y))| ChartPoint {
                    label: label.to_string(),
                    x: 1950.0 + i as f64,
                    y: *y,
                })
                .collect(),
        }
    }

    fn draw_into_buffer(chart: &ChartData) -> Result<(), String> {
        let mut buffer = vec![0u8; (FIGURE_WIDTH * FIGURE_HEIGHT * 3) as usize];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (FIGURE_WIDTH, FIGURE_HEIGHT))
                .into_drawing_area();
            root.fill(&WHITE).map_err(|e| e.to_string())?;
            StaticChartRenderer::draw(&root, chart).map_err(|e| e.to_string())?;
            root.present().map_err(|e| e.to_string())?;
        }
        assert!(buffer.iter().any(|b| *b != 255), "nothing was drawn");
        Ok(())
    }

    #[test]
    fn every_kind_draws_empty_single_and_full_series() {
        let full: Vec<(&str, f64)> = vec![
            ("Douglas DC-3", 40.0),
            ("Antonov An-2", 25.0),
            ("Boeing 737", 12.0),
            ("Cessna 208", 3.0),
        ];
        for kind in [
            ChartKind::Line,
            ChartKind::VerticalBars,
            ChartKind::HorizontalBars,
        ] {
            for values in [&[][..], &[("1952", 7.0)][..], &full[..]] {
                let chart = chart_with(kind, values);
                if let Err(e) = draw_into_buffer(&chart) {
                    panic!("{:?} with {} points failed: {}", kind, values.len(), e);
                }
            }
        }
    }

    #[test]
    fn non_finite_points_are_skipped_when_drawing() {
        let chart = chart_with(
            ChartKind::Line,
            &[("1950", 75.0), ("1951", f64::NAN), ("1952", f64::INFINITY)],
        );
        draw_into_buffer(&chart).unwrap();
    }

    #[test]
    fn exports_one_png_per_chart() {
        let report = Report {
            summary: SummaryMetrics::default(),
            crashes_per_year: vec![(1952, 1)],
            crashes_per_aircraft: vec![("Douglas DC-3".into(), 2), ("Antonov An-2".into(), 1)],
            crashes_per_region: vec![("Russia".into(), 3)],
            fatalities_by_month: vec![(1, 10), (2, 4)],
            survivor_rate_by_year: vec![(1952, 50.0)],
        };
        let charts = ChartData::from_report(&report);

        let dir = tempfile::tempdir().unwrap();
        let paths = StaticChartRenderer::render_all(&charts, dir.path()).unwrap();

        assert_eq!(paths.len(), charts.len());
        for (path, chart) in paths.iter().zip(&charts) {
            assert_eq!(path, &dir.path().join(format!("{}.png", chart.id)));
            assert!(std::fs::metadata(path).unwrap().len() > 0);
        }
    }

    #[test]
    fn ranges_handle_degenerate_input() {
        assert_eq!(padded_range(std::iter::empty(), 0.1), (0.0, 1.0));
        assert_eq!(padded_range([1990.0].into_iter(), 0.1), (1989.0, 1991.0));

        let (lo, hi) = padded_range([0.0, 10.0].into_iter(), 0.1);
        assert_eq!((lo, hi), (-1.0, 11.0));
    }

    #[test]
    fn bar_ceiling_leaves_headroom() {
        let a = ChartPoint {
            label: "a".into(),
            x: 0.0,
            y: 10.0,
        };
        assert!((bar_ceiling(&[&a]) - 11.0).abs() < 1e-9);
        assert_eq!(bar_ceiling(&[]), 1.0);
    }

    #[test]
    fn segment_labels_map_to_categories() {
        let labels = vec!["Douglas DC-3".to_string(), "Antonov".to_string()];
        assert_eq!(
            segment_label(&labels, &SegmentValue::CenterOf(1)),
            "Antonov"
        );
        assert_eq!(segment_label(&labels, &SegmentValue::Exact(5)), "");
        assert_eq!(segment_label(&labels, &SegmentValue::Last), "");
    }

    #[test]
    fn export_without_charts_creates_folder() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("charts");
        let paths = StaticChartRenderer::render_all(&[], &target).unwrap();
        assert!(paths.is_empty());
        assert!(target.is_dir());
    }
}
