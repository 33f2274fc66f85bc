//! Crash Table Module
//! The cleaned accident table: polars frame for display, typed records for aggregation.

use chrono::NaiveDate;
use polars::prelude::*;
use std::collections::BTreeSet;

pub const YEAR: &str = "Year";
pub const MONTH: &str = "Month";
pub const DAY: &str = "Day";
pub const RAW_REGION: &str = "Country/Region";
pub const REGION: &str = "Region";
pub const AIRCRAFT: &str = "Aircraft";
pub const ABOARD: &str = "Aboard";
pub const FATALITIES_AIR: &str = "Fatalities (air)";
pub const GROUND: &str = "Ground";
pub const DATE: &str = "Date";
pub const SURVIVOR_RATE: &str = "Survivor Rate (%)";

/// Columns every source file must provide (after the region rename).
pub const REQUIRED_COLUMNS: [&str; 8] = [
    YEAR,
    MONTH,
    DAY,
    REGION,
    AIRCRAFT,
    ABOARD,
    FATALITIES_AIR,
    GROUND,
];

/// One accident.
#[derive(Debug, Clone, PartialEq)]
pub struct CrashRecord {
    pub year: i64,
    pub month: u32,
    pub day: i64,
    pub region: String,
    pub aircraft: String,
    pub aboard: i64,
    pub fatalities_air: i64,
    pub ground: i64,
    /// `None` when Year/Month/Day do not form a calendar date.
    pub date: Option<NaiveDate>,
    /// Fatalities (air) / Aboard * 100. Non-finite when Aboard is zero.
    pub survivor_rate: f64,
}

/// Cleaned, read-only accident table.
///
/// `df` and `records` are row-aligned: row `i` of the frame is `records[i]`.
#[derive(Debug, Clone, Default)]
pub struct CrashTable {
    df: DataFrame,
    records: Vec<CrashRecord>,
}

impl CrashTable {
    pub(crate) fn new(df: DataFrame, records: Vec<CrashRecord>) -> Self {
        debug_assert_eq!(df.height(), records.len());
        Self { df, records }
    }

    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    pub fn records(&self) -> &[CrashRecord] {
        &self.records
    }

    pub fn height(&self) -> usize {
        self.records.len()
    }

    /// Get column names of the display frame.
    pub fn column_names(&self) -> Vec<String> {
        self.df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    /// Distinct years, ascending.
    pub fn years(&self) -> Vec<i64> {
        self.records
            .iter()
            .map(|r| r.year)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Number of rows whose date could not be constructed.
    pub fn invalid_dates(&self) -> usize {
        self.records.iter().filter(|r| r.date.is_none()).count()
    }

    /// Rows whose year is in `selected`. An empty selection gives an empty table.
    pub fn filter_years(&self, selected: &BTreeSet<i64>) -> PolarsResult<CrashTable> {
        let keep: Vec<bool> = self
            .records
            .iter()
            .map(|r| selected.contains(&r.year))
            .collect();
        let mask = BooleanChunked::from_slice("year_filter".into(), &keep);
        let df = self.df.filter(&mask)?;

        let records = self
            .records
            .iter()
            .zip(keep.iter())
            .filter(|(_, &k)| k)
            .map(|(r, _)| r.clone())
            .collect();

        Ok(CrashTable::new(df, records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DataProcessor;

    fn sample() -> CrashTable {
        let raw = df!(
            YEAR => [1950i64, 1950, 1951, 1953],
            MONTH => [1i64, 2, 3, 4],
            DAY => [1i64, 2, 3, 4],
            RAW_REGION => ["A", "B", "A", "C"],
            AIRCRAFT => ["X", "Y", "X", "Z"],
            ABOARD => [10i64, 20, 4, 8],
            FATALITIES_AIR => [5i64, 20, 1, 2],
            GROUND => [0i64, 0, 3, 1],
        )
        .unwrap();
        DataProcessor::clean(raw).unwrap()
    }

    #[test]
    fn years_are_distinct_and_sorted() {
        assert_eq!(sample().years(), vec![1950, 1951, 1953]);
    }

    #[test]
    fn filter_keeps_frame_and_records_aligned() {
        let table = sample();
        let selected: BTreeSet<i64> = [1950, 1953].into_iter().collect();
        let filtered = table.filter_years(&selected).unwrap();

        assert_eq!(filtered.height(), 3);
        assert_eq!(filtered.dataframe().height(), 3);
        assert!(filtered.records().iter().all(|r| selected.contains(&r.year)));
    }

    #[test]
    fn empty_selection_gives_empty_table() {
        let filtered = sample().filter_years(&BTreeSet::new()).unwrap();
        assert_eq!(filtered.height(), 0);
        assert_eq!(filtered.dataframe().height(), 0);
    }
}
