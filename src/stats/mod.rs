//! Stats module - Typed aggregation and the dashboard report

mod calculator;
mod report;

pub use calculator::StatsCalculator;
pub use report::{Report, SummaryMetrics};
