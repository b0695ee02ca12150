//! CSV Data Loader Module
//! Reads the life-expectancy CSV with Polars and coerces rows into typed records.

use crate::data::record::{Dataset, Record};
use polars::prelude::*;
use rayon::prelude::*;
use std::path::PathBuf;
use thiserror::Error;

/// Header names, matched trimmed and case-insensitively.
pub const COUNTRY_COL: &str = "Country";
pub const YEAR_COL: &str = "Year";
pub const STATUS_COL: &str = "Status";
pub const LIFE_EXPECTANCY_COL: &str = "Life expectancy";
pub const GDP_COL: &str = "GDP";
pub const POPULATION_COL: &str = "Population";

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Missing required column: {0}")]
    MissingColumn(String),
    #[error("No usable rows in data file")]
    NoData,
}

/// Row filtering options.
#[derive(Debug, Clone, Copy)]
pub struct LoadOptions {
    /// Drop rows without a life expectancy value at load time.
    pub require_life_expectancy: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            require_life_expectancy: true,
        }
    }
}

/// Row accounting for one load. `kept + dropped() == total_rows` always holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub total_rows: usize,
    pub kept: usize,
    pub dropped_missing_country: usize,
    pub dropped_missing_year: usize,
    pub dropped_missing_life_expectancy: usize,
}

impl LoadReport {
    pub fn dropped(&self) -> usize {
        self.dropped_missing_country
            + self.dropped_missing_year
            + self.dropped_missing_life_expectancy
    }
}

/// Result of a successful load.
#[derive(Debug)]
pub struct LoadedData {
    pub dataset: Dataset,
    pub report: LoadReport,
}

enum RowOutcome {
    Kept(Record),
    MissingCountry,
    MissingYear,
    MissingLifeExpectancy,
}

/// Loads the CSV and applies the row coercion rules.
pub struct DataLoader {
    options: LoadOptions,
    file_path: Option<PathBuf>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new(LoadOptions::default())
    }
}

impl DataLoader {
    pub fn new(options: LoadOptions) -> Self {
        Self {
            options,
            file_path: None,
        }
    }

    /// Load a CSV file. Every column is read as text so that numeric
    /// coercion follows [`parse_number`] rather than Polars inference.
    pub fn load_csv(&mut self, file_path: &str) -> Result<LoadedData, LoaderError> {
        self.file_path = Some(PathBuf::from(file_path));
        tracing::info!(path = %file_path, "loading CSV");

        let df = LazyCsvReader::new(file_path)
            .with_infer_schema_length(Some(0))
            .with_ignore_errors(true)
            .finish()?
            .collect()?;

        self.load_dataframe(&df)
    }

    /// Coerce an all-text DataFrame into a dataset.
    pub fn load_dataframe(&self, df: &DataFrame) -> Result<LoadedData, LoaderError> {
        let height = df.height();

        let country = text_values(Some(required_column(df, COUNTRY_COL)?))?;
        let year = text_values(Some(required_column(df, YEAR_COL)?))?;
        let life = text_values(Some(required_column(df, LIFE_EXPECTANCY_COL)?))?;
        let status = text_values(find_column(df, STATUS_COL))?;
        let gdp = text_values(find_column(df, GDP_COL))?;
        let population = text_values(find_column(df, POPULATION_COL))?;

        let cell = |values: &[Option<String>], i: usize| -> Option<String> {
            values.get(i).cloned().flatten()
        };

        let outcomes: Vec<RowOutcome> = (0..height)
            .into_par_iter()
            .map(|i| {
                self.coerce_row(
                    cell(&country, i).as_deref(),
                    cell(&year, i).as_deref(),
                    cell(&status, i).as_deref(),
                    cell(&life, i).as_deref(),
                    cell(&gdp, i).as_deref(),
                    cell(&population, i).as_deref(),
                )
            })
            .collect();

        let mut report = LoadReport {
            total_rows: height,
            ..LoadReport::default()
        };
        let mut records = Vec::with_capacity(height);
        for outcome in outcomes {
            match outcome {
                RowOutcome::Kept(record) => {
                    report.kept += 1;
                    records.push(record);
                }
                RowOutcome::MissingCountry => report.dropped_missing_country += 1,
                RowOutcome::MissingYear => report.dropped_missing_year += 1,
                RowOutcome::MissingLifeExpectancy => report.dropped_missing_life_expectancy += 1,
            }
        }

        if report.dropped() > 0 {
            tracing::info!(
                missing_country = report.dropped_missing_country,
                missing_year = report.dropped_missing_year,
                missing_life_expectancy = report.dropped_missing_life_expectancy,
                "dropped incomplete rows"
            );
        }

        let dataset = Dataset::new(records)?;
        tracing::info!(
            rows = report.total_rows,
            kept = report.kept,
            countries = dataset.countries().len(),
            min_year = dataset.min_year(),
            max_year = dataset.max_year(),
            "dataset loaded"
        );

        Ok(LoadedData { dataset, report })
    }

    fn coerce_row(
        &self,
        country: Option<&str>,
        year: Option<&str>,
        status: Option<&str>,
        life: Option<&str>,
        gdp: Option<&str>,
        population: Option<&str>,
    ) -> RowOutcome {
        let country = match country.map(str::trim) {
            Some(c) if !c.is_empty() => c.to_string(),
            _ => return RowOutcome::MissingCountry,
        };
        let Some(year) = parse_year(year) else {
            return RowOutcome::MissingYear;
        };
        let life_expectancy = parse_number(life);
        if self.options.require_life_expectancy && life_expectancy.is_none() {
            return RowOutcome::MissingLifeExpectancy;
        }

        RowOutcome::Kept(Record {
            status: status
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            gdp: parse_number(gdp),
            population: parse_number(population),
            ..Record::new(country, year, life_expectancy)
        })
    }

    /// Get file path of the last load.
    pub fn get_file_path(&self) -> Option<&PathBuf> {
        self.file_path.as_ref()
    }
}

/// Coerce a raw field to a number. Empty, whitespace-only, non-numeric and
/// non-finite values are absent, never zero.
pub fn parse_number(raw: Option<&str>) -> Option<f64> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Coerce a raw field to an integral year.
pub fn parse_year(raw: Option<&str>) -> Option<i32> {
    let value = parse_number(raw)?;
    if value.fract() != 0.0 || value < i32::MIN as f64 || value > i32::MAX as f64 {
        return None;
    }
    Some(value as i32)
}

fn find_column<'a>(df: &'a DataFrame, wanted: &str) -> Option<&'a Column> {
    df.get_columns()
        .iter()
        .find(|col| col.name().trim().eq_ignore_ascii_case(wanted))
}

fn required_column<'a>(df: &'a DataFrame, wanted: &str) -> Result<&'a Column, LoaderError> {
    find_column(df, wanted).ok_or_else(|| LoaderError::MissingColumn(wanted.to_string()))
}

/// Materialize a column as owned optional strings; a missing column is empty.
fn text_values(column: Option<&Column>) -> Result<Vec<Option<String>>, LoaderError> {
    let Some(column) = column else {
        return Ok(Vec::new());
    };
    let casted = column.cast(&DataType::String)?;
    let ca = casted.str()?;
    Ok(ca.into_iter().map(|v| v.map(str::to_string)).collect())
}
