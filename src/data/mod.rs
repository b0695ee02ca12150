//! Data module - CSV loading, the record table and shared queries

mod loader;
mod processor;
mod record;

pub use loader::{DataLoader, LoadOptions, LoadReport, LoadedData};
pub use processor::DataProcessor;
pub use record::Dataset;
#[cfg(test)]
pub use record::Record;
