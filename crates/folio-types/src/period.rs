use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// A calendar month that scopes period-based number sequences.
///
/// Rendered into identifiers as two-digit year followed by two-digit month,
/// so June 2024 becomes `2406`. Sequences reset implicitly per period
/// because the period is part of the prefix used for the max lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Period {
    year: i32,
    month: u32,
}

impl Period {
    /// Create a period, validating the month.
    pub fn new(year: i32, month: u32) -> Result<Self, TypeError> {
        if !(1..=12).contains(&month) {
            return Err(TypeError::InvalidPeriod(format!(
                "month must be 1-12, got {month}"
            )));
        }
        if year < 0 {
            return Err(TypeError::InvalidPeriod(format!(
                "year must not be negative, got {year}"
            )));
        }
        Ok(Self { year, month })
    }

    /// The period containing `date`.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year().max(0),
            month: date.month(),
        }
    }

    /// The period of the current UTC wall-clock date.
    ///
    /// Only outer layers (CLI, HTTP handlers) should call this; everything
    /// below them takes the period as an explicit argument.
    pub fn current() -> Self {
        Self::from_date(Utc::now().date_naive())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Two-digit year (`24` for 2024).
    pub fn yy(&self) -> String {
        format!("{:02}", self.year % 100)
    }

    /// Two-digit month (`06` for June).
    pub fn mm(&self) -> String {
        format!("{:02}", self.month)
    }

    /// Compact year+month marker used inside identifiers (`2406`).
    pub fn yymm(&self) -> String {
        format!("{}{}", self.yy(), self.mm())
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Period {
    type Err = TypeError;

    /// Parse `YYYY-MM`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TypeError::InvalidPeriod(s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.is_empty() || month.len() > 2 {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month)
    }
}
