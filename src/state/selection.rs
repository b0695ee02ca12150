//! Selection State
//! The (year, country) pair shared by every chart.

use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SelectionError {
    #[error("No data loaded")]
    NotReady,
    #[error("Unknown country: {0}")]
    UnknownCountry(String),
    #[error("Year {year} outside {min}..={max}")]
    YearOutOfRange { year: i32, min: i32, max: i32 },
}

/// Where a selection change came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SelectionSource {
    Slider,
    Dropdown,
    BarClick,
    ScatterClick,
}

/// Partial update passed to the single mutator; `None` fields are left as is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionUpdate {
    pub year: Option<i32>,
    pub country: Option<String>,
}

impl SelectionUpdate {
    pub fn year(year: i32) -> Self {
        Self {
            year: Some(year),
            country: None,
        }
    }

    pub fn country(country: impl Into<String>) -> Self {
        Self {
            year: None,
            country: Some(country.into()),
        }
    }
}

/// Currently displayed year and highlighted country.
///
/// Empty until data loads. Only `Dashboard` writes it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Selection {
    pub(super) year: Option<i32>,
    pub(super) country: Option<String>,
    /// Set once the user picks a country; until then the default follows the year.
    pub(super) country_explicit: bool,
}

impl Selection {
    pub fn year(&self) -> Option<i32> {
        self.year
    }

    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    pub fn is_country_explicit(&self) -> bool {
        self.country_explicit
    }

    pub fn is_initialized(&self) -> bool {
        self.year.is_some()
    }
}
