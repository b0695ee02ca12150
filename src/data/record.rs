//! Record and Dataset types
//! One row per country-year observation, plus the immutable table built from them.

use crate::data::loader::LoaderError;
use serde::Serialize;

/// One country-year observation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub country: String,
    pub year: i32,
    pub status: Option<String>,
    pub life_expectancy: Option<f64>,
    pub gdp: Option<f64>,
    pub population: Option<f64>,
}

impl Record {
    /// Build a record with only the required fields set.
    pub fn new(country: impl Into<String>, year: i32, life_expectancy: Option<f64>) -> Self {
        Self {
            country: country.into(),
            year,
            status: None,
            life_expectancy,
            gdp: None,
            population: None,
        }
    }
}

#[cfg(test)]
impl Record {
    pub fn with_gdp(mut self, gdp: f64) -> Self {
        self.gdp = Some(gdp);
        self
    }
}

/// The loaded table. Immutable after construction; share it behind an `Arc`.
#[derive(Debug)]
pub struct Dataset {
    records: Vec<Record>,
    min_year: i32,
    max_year: i32,
    countries: Vec<String>,
}

impl Dataset {
    /// Build a dataset from already-validated records.
    ///
    /// Fails with [`LoaderError::NoData`] when `records` is empty, since the
    /// year range would be undefined.
    pub fn new(records: Vec<Record>) -> Result<Self, LoaderError> {
        let min_year = records.iter().map(|r| r.year).min().ok_or(LoaderError::NoData)?;
        let max_year = records.iter().map(|r| r.year).max().ok_or(LoaderError::NoData)?;

        let mut countries: Vec<String> = records.iter().map(|r| r.country.clone()).collect();
        countries.sort();
        countries.dedup();

        Ok(Self {
            records,
            min_year,
            max_year,
            countries,
        })
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn min_year(&self) -> i32 {
        self.min_year
    }

    pub fn max_year(&self) -> i32 {
        self.max_year
    }

    /// Sorted distinct country names.
    pub fn countries(&self) -> &[String] {
        &self.countries
    }

    pub fn contains_country(&self, country: &str) -> bool {
        self.countries
            .binary_search_by(|c| c.as_str().cmp(country))
            .is_ok()
    }

    pub fn contains_year(&self, year: i32) -> bool {
        (self.min_year..=self.max_year).contains(&year)
    }

    /// Country of the first record in file order.
    pub fn first_country(&self) -> Option<&str> {
        self.records.first().map(|r| r.country.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_range_and_countries() {
        let ds = Dataset::new(vec![
            Record::new("Zambia", 2003, Some(50.0)),
            Record::new("Albania", 2010, Some(76.0)),
            Record::new("Zambia", 2001, Some(48.0)),
        ])
        .unwrap();

        assert_eq!(ds.min_year(), 2001);
        assert_eq!(ds.max_year(), 2010);
        assert_eq!(ds.countries(), &["Albania".to_string(), "Zambia".to_string()]);
        assert_eq!(ds.first_country(), Some("Zambia"));
        assert!(ds.contains_country("Albania"));
        assert!(!ds.contains_country("France"));
        assert!(ds.contains_year(2005));
        assert!(!ds.contains_year(2011));
    }

    #[test]
    fn test_empty_dataset_is_rejected() {
        assert!(matches!(Dataset::new(Vec::new()), Err(LoaderError::NoData)));
    }
}
