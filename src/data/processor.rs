//! Data Processor Module
//! Filtering and aggregation queries shared by the chart models.

use crate::data::record::{Dataset, Record};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Stateless query helpers over a [`Dataset`].
pub struct DataProcessor;

impl DataProcessor {
    /// Records for `year` with a defined life expectancy, in file order.
    pub fn records_for_year(dataset: &Dataset, year: i32) -> Vec<&Record> {
        dataset
            .records()
            .iter()
            .filter(|r| r.year == year && r.life_expectancy.is_some())
            .collect()
    }

    /// Life expectancy values for `year`.
    pub fn life_expectancy_for_year(dataset: &Dataset, year: i32) -> Vec<f64> {
        Self::records_for_year(dataset, year)
            .into_iter()
            .filter_map(|r| r.life_expectancy)
            .collect()
    }

    /// Maximum life expectancy per country for `year`.
    ///
    /// Guards against duplicate country-year rows. Sorted descending by value,
    /// ties broken by country name ascending.
    pub fn max_by_country(dataset: &Dataset, year: i32) -> Vec<(String, f64)> {
        let mut best: HashMap<&str, f64> = HashMap::new();
        for record in Self::records_for_year(dataset, year) {
            if let Some(value) = record.life_expectancy {
                best.entry(record.country.as_str())
                    .and_modify(|v| *v = v.max(value))
                    .or_insert(value);
            }
        }

        let mut ranked: Vec<(String, f64)> = best
            .into_iter()
            .map(|(country, value)| (country.to_string(), value))
            .collect();
        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        ranked
    }

    /// Top `n` countries by life expectancy for `year`.
    pub fn top_countries(dataset: &Dataset, year: i32, n: usize) -> Vec<(String, f64)> {
        let mut ranked = Self::max_by_country(dataset, year);
        ranked.truncate(n);
        ranked
    }

    /// Life expectancy series for `country`: one point per year (max on
    /// duplicates), ascending by year.
    pub fn country_series(dataset: &Dataset, country: &str) -> Vec<(i32, f64)> {
        let mut by_year: HashMap<i32, f64> = HashMap::new();
        for record in dataset.records().iter().filter(|r| r.country == country) {
            if let Some(value) = record.life_expectancy {
                by_year
                    .entry(record.year)
                    .and_modify(|v| *v = v.max(value))
                    .or_insert(value);
            }
        }

        let mut series: Vec<(i32, f64)> = by_year.into_iter().collect();
        series.sort_by_key(|(year, _)| *year);
        series
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> Dataset {
        Dataset::new(vec![
            Record::new("Chad", 2010, Some(50.0)),
            Record::new("Chad", 2010, Some(52.0)),
            Record::new("Peru", 2010, Some(74.0)),
            Record::new("Fiji", 2010, Some(74.0)),
            Record::new("Oman", 2010, None),
            Record::new("Chad", 2008, Some(49.0)),
            Record::new("Chad", 2009, Some(49.5)),
        ])
        .unwrap()
    }

    #[test]
    fn test_max_by_country_dedups_and_sorts() {
        let ranked = DataProcessor::max_by_country(&dataset(), 2010);
        assert_eq!(
            ranked,
            vec![
                ("Fiji".to_string(), 74.0),
                ("Peru".to_string(), 74.0),
                ("Chad".to_string(), 52.0),
            ]
        );
    }

    #[test]
    fn test_top_countries_truncates() {
        let top = DataProcessor::top_countries(&dataset(), 2010, 1);
        assert_eq!(top, vec![("Fiji".to_string(), 74.0)]);
        assert!(DataProcessor::top_countries(&dataset(), 1990, 10).is_empty());
    }

    #[test]
    fn test_records_for_year_skips_undefined() {
        let ds = dataset();
        let rows = DataProcessor::records_for_year(&ds, 2010);
        assert_eq!(rows.len(), 4);
        assert!(rows.iter().all(|r| r.country != "Oman"));
    }

    #[test]
    fn test_country_series_sorted_by_year() {
        let series = DataProcessor::country_series(&dataset(), "Chad");
        assert_eq!(series, vec![(2008, 49.0), (2009, 49.5), (2010, 52.0)]);
    }
}
