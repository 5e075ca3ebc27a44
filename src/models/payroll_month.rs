//! Payroll month token.
//!
//! Payroll months travel as fixed-width `"YYYY-MM"` strings. [`PayrollMonth`]
//! validates the token once and orders exactly like the string would.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// A calendar month used as a payroll period and as a rate-table key.
///
/// Ordering compares year then month, which matches lexicographic ordering of
/// the `"YYYY-MM"` token.
///
/// # Example
///
/// ```
/// use payroll_engine::models::PayrollMonth;
///
/// let june: PayrollMonth = "2025-06".parse().unwrap();
/// let january: PayrollMonth = "2025-01".parse().unwrap();
/// assert!(january < june);
/// assert_eq!(june.to_string(), "2025-06");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PayrollMonth {
    year: i32,
    month: u32,
}

impl PayrollMonth {
    /// Creates a payroll month, rejecting months outside 1-12 and years
    /// outside 1000-9999.
    pub fn new(year: i32, month: u32) -> Result<Self, EngineError> {
        if !(1000..=9999).contains(&year) || !(1..=12).contains(&month) {
            return Err(EngineError::InvalidMonth {
                value: format!("{}-{:02}", year, month),
            });
        }
        Ok(Self { year, month })
    }

    /// Returns the month containing the given date.
    pub fn from_date(date: NaiveDate) -> Result<Self, EngineError> {
        Self::new(date.year(), date.month())
    }

    /// The calendar year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// The calendar month, 1-12.
    pub fn month(&self) -> u32 {
        self.month
    }
}

impl fmt::Display for PayrollMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for PayrollMonth {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::InvalidMonth {
            value: s.to_string(),
        };

        // Fixed width keeps string ordering and month ordering in agreement.
        let digits_in_place = s
            .bytes()
            .enumerate()
            .all(|(i, b)| if i == 4 { b == b'-' } else { b.is_ascii_digit() });
        if s.len() != 7 || !digits_in_place {
            return Err(invalid());
        }

        let date =
            NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d").map_err(|_| invalid())?;
        Self::from_date(date).map_err(|_| invalid())
    }
}

impl TryFrom<String> for PayrollMonth {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PayrollMonth> for String {
    fn from(month: PayrollMonth) -> Self {
        month.to_string()
    }
}
