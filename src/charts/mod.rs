//! Charts module - Chart series, interactive plots and PNG export

mod plotter;
mod renderer;

pub use plotter::{ChartData, ChartKind, ChartPlotter, ChartPoint};
pub use renderer::StaticChartRenderer;
