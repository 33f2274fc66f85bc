//! Data Processor Module
//! Cleans the raw accident frame and derives Date and Survivor Rate.

use crate::data::table::{
    CrashRecord, CrashTable, ABOARD, AIRCRAFT, DATE, DAY, FATALITIES_AIR, GROUND, MONTH,
    RAW_REGION, REGION, REQUIRED_COLUMNS, SURVIVOR_RATE, YEAR,
};
use crate::data::LoaderError;
use chrono::{Datelike, NaiveDate};
use polars::prelude::*;
use tracing::{debug, warn};

/// `NaiveDate::num_days_from_ce` of 1970-01-01, the polars `Date` epoch.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

const MONTH_NAMES: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// Handles data cleaning and derived columns.
pub struct DataProcessor;

impl DataProcessor {
    /// Turn a raw accident frame into a [`CrashTable`].
    ///
    /// 1. drop every row holding a null (or a float NaN) in any column
    /// 2. rename `Country/Region` to `Region` when present
    /// 3. drop rows whose required cells don't read as their typed value
    /// 4. derive `Date` (null when not a calendar date)
    /// 5. derive `Survivor Rate (%)` = Fatalities (air) / Aboard * 100
    pub fn clean(raw: DataFrame) -> Result<CrashTable, LoaderError> {
        let raw_rows = raw.height();
        let mut df = nan_to_null(raw)?.drop_nulls::<String>(None)?;
        debug!(
            raw_rows,
            kept = df.height(),
            "dropped rows with missing values"
        );

        if df.column(RAW_REGION).is_ok() && df.column(REGION).is_err() {
            df.rename(RAW_REGION, REGION.into())?;
        }

        for name in REQUIRED_COLUMNS {
            if df.column(name).is_err() {
                return Err(LoaderError::MissingColumn(name.to_string()));
            }
        }

        let parsed = Self::parse_records(&df)?;
        let keep: Vec<bool> = parsed.iter().map(Option::is_some).collect();
        if keep.iter().any(|k| !k) {
            let malformed = keep.iter().filter(|k| !**k).count();
            warn!(malformed, "dropped rows with unreadable values");
            let mask = BooleanChunked::from_slice("well_formed".into(), &keep);
            df = df.filter(&mask)?;
        }

        let mut records: Vec<CrashRecord> = parsed.into_iter().flatten().collect();
        for record in &mut records {
            record.date = Self::build_date(record.year, record.month, record.day);
            record.survivor_rate = Self::survivor_rate(record.fatalities_air, record.aboard);
        }

        let invalid_dates = records.iter().filter(|r| r.date.is_none()).count();
        if invalid_dates > 0 {
            warn!(invalid_dates, "rows without a valid calendar date");
        }

        let date_days: Vec<Option<i32>> = records
            .iter()
            .map(|r| {
                r.date
                    .map(|d| d.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE)
            })
            .collect();
        let rates: Vec<f64> = records.iter().map(|r| r.survivor_rate).collect();

        df.with_column(Column::new(DATE.into(), date_days).cast(&DataType::Date)?)?;
        df.with_column(Column::new(SURVIVOR_RATE.into(), rates))?;

        Ok(CrashTable::new(df, records))
    }

    /// Read typed records; `None` marks a row with an unreadable required cell.
    fn parse_records(df: &DataFrame) -> Result<Vec<Option<CrashRecord>>, LoaderError> {
        let years = int_column(df, YEAR)?;
        let months: Vec<Option<u32>> = text_column(df, MONTH)?
            .into_iter()
            .map(|m| m.as_deref().and_then(Self::parse_month))
            .collect();
        let days = int_column(df, DAY)?;
        let regions = text_column(df, REGION)?;
        let aircraft = text_column(df, AIRCRAFT)?;
        let aboard = int_column(df, ABOARD)?;
        let fatalities = int_column(df, FATALITIES_AIR)?;
        let ground = int_column(df, GROUND)?;

        Ok((0..df.height())
            .map(|i| -> Option<CrashRecord> {
                Some(CrashRecord {
                    year: years[i]?,
                    month: months[i]?,
                    day: days[i]?,
                    region: regions[i].clone()?,
                    aircraft: aircraft[i].clone()?,
                    aboard: aboard[i]?,
                    fatalities_air: fatalities[i]?,
                    ground: ground[i]?,
                    date: None,
                    survivor_rate: f64::NAN,
                })
            })
            .collect())
    }

    /// Month as 1..=12, from a number ("3", "3.0") or an English name ("March", "Mar").
    pub fn parse_month(raw: &str) -> Option<u32> {
        let raw = raw.trim();
        if let Ok(n) = raw.parse::<f64>() {
            return (n.fract() == 0.0 && (1.0..=12.0).contains(&n)).then_some(n as u32);
        }

        let lower = raw.to_ascii_lowercase();
        let prefix = lower.get(..3)?;
        MONTH_NAMES
            .iter()
            .position(|name| *name == prefix)
            .map(|idx| idx as u32 + 1)
    }

    /// Join the parts as `Y-M-D` text and parse it; invalid dates give `None`.
    pub fn build_date(year: i64, month: u32, day: i64) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&format!("{}-{}-{}", year, month, day), "%Y-%m-%d").ok()
    }

    /// Despite the name this is the fatality share of those aboard.
    /// Aboard == 0 propagates as inf/NaN.
    pub fn survivor_rate(fatalities_air: i64, aboard: i64) -> f64 {
        fatalities_air as f64 / aboard as f64 * 100.0
    }
}

/// Float NaN counts as missing, same as an empty cell.
fn nan_to_null(df: DataFrame) -> PolarsResult<DataFrame> {
    let columns = df
        .get_columns()
        .iter()
        .map(|column| match column.dtype() {
            DataType::Float32 | DataType::Float64 => {
                let values = column.cast(&DataType::Float64)?;
                let cleaned: Float64Chunked = values
                    .f64()?
                    .into_iter()
                    .map(|v| v.filter(|x| !x.is_nan()))
                    .collect();
                Ok(Column::from(
                    cleaned.with_name(column.name().clone()).into_series(),
                ))
            }
            _ => Ok(column.clone()),
        })
        .collect::<PolarsResult<Vec<Column>>>()?;
    DataFrame::new(columns)
}

/// Whole numbers only; a fractional or non-finite count reads as `None`.
fn int_column(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<i64>>> {
    let casted = df.column(name)?.cast(&DataType::Float64)?;
    let values = casted
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| x.is_finite() && x.fract() == 0.0).map(|x| x as i64))
        .collect();
    Ok(values)
}

fn text_column(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<String>>> {
    let casted = df.column(name)?.cast(&DataType::String)?;
    let values = casted
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect();
    Ok(values)
}
