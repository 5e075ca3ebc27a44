//! Statutory contribution rate records.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::PayrollMonth;
use crate::error::{EngineError, EngineResult};

/// Statutory contribution percentages effective from a given month.
///
/// All rates are employee-side fractions (e.g. `0.045` for 4.5%). The
/// long-term care rate is a fraction of the health insurance amount, not of
/// gross pay.
///
/// # Example
///
/// ```
/// use payroll_engine::models::RateRecord;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let record = RateRecord {
///     effective_month: "2025-01".parse().unwrap(),
///     national_pension_rate: Decimal::from_str("0.045").unwrap(),
///     health_insurance_rate: Decimal::from_str("0.03545").unwrap(),
///     long_term_care_rate_of_health: Decimal::from_str("0.1295").unwrap(),
///     employment_insurance_rate: Decimal::from_str("0.009").unwrap(),
///     national_pension_min: Decimal::from(390_000),
///     national_pension_max: Decimal::from(6_170_000),
/// };
/// assert!(record.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateRecord {
    /// First payroll month (inclusive) these rates apply to.
    pub effective_month: PayrollMonth,
    /// National pension contribution rate.
    pub national_pension_rate: Decimal,
    /// Health insurance contribution rate.
    pub health_insurance_rate: Decimal,
    /// Long-term care rate, applied to the health insurance amount.
    pub long_term_care_rate_of_health: Decimal,
    /// Employment insurance contribution rate.
    pub employment_insurance_rate: Decimal,
    /// Lower bound of the pension income base.
    pub national_pension_min: Decimal,
    /// Upper bound of the pension income base.
    pub national_pension_max: Decimal,
}

impl RateRecord {
    /// Checks that every rate lies in `[0, 1]` and that the pension bounds
    /// are non-negative and ordered.
    pub fn validate(&self) -> EngineResult<()> {
        let rates = [
            ("national_pension_rate", self.national_pension_rate),
            ("health_insurance_rate", self.health_insurance_rate),
            (
                "long_term_care_rate_of_health",
                self.long_term_care_rate_of_health,
            ),
            ("employment_insurance_rate", self.employment_insurance_rate),
        ];

        for (name, rate) in rates {
            if rate < Decimal::ZERO || rate > Decimal::ONE {
                return Err(self.invalid(format!("{} {} is outside [0, 1]", name, rate)));
            }
        }

        if self.national_pension_min < Decimal::ZERO {
            return Err(self.invalid(format!(
                "national_pension_min {} is negative",
                self.national_pension_min
            )));
        }

        if self.national_pension_min > self.national_pension_max {
            return Err(self.invalid(format!(
                "national_pension_min {} exceeds national_pension_max {}",
                self.national_pension_min, self.national_pension_max
            )));
        }

        Ok(())
    }

    fn invalid(&self, message: String) -> EngineError {
        EngineError::InvalidRateRecord {
            effective_month: self.effective_month.to_string(),
            message,
        }
    }
}
