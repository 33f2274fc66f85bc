//! Data module - CSV loading, cleaning and the accident table

mod loader;
mod processor;
pub mod table;

pub use loader::{DataLoader, LoaderError};
pub use processor::DataProcessor;
pub use table::{CrashRecord, CrashTable};
