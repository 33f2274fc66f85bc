//! Report Module
//! The summary metrics and the five aggregate series behind the charts.

use crate::data::{CrashRecord, CrashTable};
use crate::stats::StatsCalculator;
use tracing::debug;

/// Fatality totals shown as the three headline metrics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SummaryMetrics {
    pub ground: i64,
    pub air: i64,
    pub total: i64,
}

impl SummaryMetrics {
    pub fn compute(records: &[CrashRecord]) -> Self {
        let ground: i64 = records.iter().map(|r| r.ground).sum();
        let air: i64 = records.iter().map(|r| r.fatalities_air).sum();
        Self {
            ground,
            air,
            total: ground + air,
        }
    }
}

/// Everything the dashboard plots, computed from one table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    pub summary: SummaryMetrics,
    /// (year, crashes), year ascending.
    pub crashes_per_year: Vec<(i64, usize)>,
    /// (aircraft, crashes), most crashes first.
    pub crashes_per_aircraft: Vec<(String, usize)>,
    /// (region, crashes), most crashes first.
    pub crashes_per_region: Vec<(String, usize)>,
    /// (month 1..=12, air fatalities), all years merged.
    pub fatalities_by_month: Vec<(u32, i64)>,
    /// (year, mean survivor rate %), year ascending.
    pub survivor_rate_by_year: Vec<(i64, f64)>,
}

impl Report {
    /// Build every view from `table`.
    ///
    /// The dashboard passes the full table here, never the year-filtered one.
    pub fn build(table: &CrashTable, top_n: usize) -> Self {
        let records = table.records();

        let by_year = StatsCalculator::group_by(records, |r| r.year);
        let by_aircraft = StatsCalculator::group_by(records, |r| r.aircraft.clone());
        let by_region = StatsCalculator::group_by(records, |r| r.region.clone());
        let by_month = StatsCalculator::group_by(records, |r| r.month);

        let report = Self {
            summary: SummaryMetrics::compute(records),
            crashes_per_year: StatsCalculator::count(&by_year),
            crashes_per_aircraft: StatsCalculator::top_n(
                StatsCalculator::count(&by_aircraft),
                top_n,
            ),
            crashes_per_region: StatsCalculator::top_n(StatsCalculator::count(&by_region), top_n),
            fatalities_by_month: StatsCalculator::sum(&by_month, |r| r.fatalities_air),
            survivor_rate_by_year: StatsCalculator::mean(&by_year, |r| r.survivor_rate),
        };

        debug!(
            rows = records.len(),
            years = report.crashes_per_year.len(),
            aircraft = by_aircraft.len(),
            regions = by_region.len(),
            "report built"
        );

        report
    }
}
