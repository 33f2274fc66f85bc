//! CSV Data Loader Module
//! Reads the accident CSV with Polars and hands it to the processor.

use crate::data::{CrashTable, DataProcessor};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info};

/// Cell texts read as missing, besides the empty cell.
pub const MISSING_MARKERS: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN", "<NA>",
    "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Data file not found: {0}")]
    NotFound(PathBuf),
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Missing required column: {0}")]
    MissingColumn(String),
}

/// Loads the accident table from a fixed CSV path.
///
/// Nothing is cached: every call re-reads the file, so reloading is just
/// calling [`DataLoader::load`] again.
pub struct DataLoader {
    file_path: PathBuf,
}

impl DataLoader {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
        }
    }

    /// Get file path.
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Point the loader at another CSV (takes effect on the next load).
    pub fn set_file_path(&mut self, file_path: impl Into<PathBuf>) {
        self.file_path = file_path.into();
    }

    /// Read, clean and derive. A missing file is fatal for the caller.
    pub fn load(&self) -> Result<CrashTable, LoaderError> {
        let result = Self::read_csv(&self.file_path).and_then(DataProcessor::clean);
        match &result {
            Ok(table) => info!(
                path = %self.file_path.display(),
                rows = table.height(),
                years = table.years().len(),
                invalid_dates = table.invalid_dates(),
                "loaded accident table"
            ),
            Err(e) => error!(path = %self.file_path.display(), "load failed: {}", e),
        }
        result
    }

    /// Read the raw CSV without any cleaning.
    pub fn read_csv(path: &Path) -> Result<DataFrame, LoaderError> {
        if !path.is_file() {
            return Err(LoaderError::NotFound(path.to_path_buf()));
        }

        let df = LazyCsvReader::new(path)
            .with_infer_schema_length(Some(10000))
            .with_ignore_errors(true)
            .with_null_values(Some(NullValues::AllColumns(
                MISSING_MARKERS.iter().map(|m| (*m).into()).collect(),
            )))
            .finish()?
            .collect()?;

        Ok(df)
    }
}
