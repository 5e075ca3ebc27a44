//! Payroll input model and tax treatment.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::PayrollMonth;
use crate::error::{EngineError, EngineResult};

/// How an employee's pay is taxed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxType {
    /// Regular employee subject to the four statutory insurances and the
    /// income tax table.
    #[serde(alias = "four_insurance")]
    StatutoryFourInsurance,
    /// Contract worker subject to the flat 3.3% withholding instead.
    #[serde(alias = "freelancer")]
    FlatWithholding,
}

impl TaxType {
    /// Returns the wire name of the tax type.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaxType::StatutoryFourInsurance => "statutory_four_insurance",
            TaxType::FlatWithholding => "flat_withholding",
        }
    }
}

/// Dependents count used when a request omits it: the employee alone.
pub(crate) fn default_dependents() -> u32 {
    1
}

/// A single employee's payroll computation request.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{PayrollInput, TaxType};
/// use rust_decimal::Decimal;
///
/// let input = PayrollInput {
///     employee_id: "emp_001".to_string(),
///     base_pay: Decimal::from(2_500_000),
///     payroll_month: "2025-06".parse().unwrap(),
///     tax_type: TaxType::StatutoryFourInsurance,
///     dependents_count: 1,
/// };
/// assert!(input.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollInput {
    /// Identifier of the employee the pay belongs to.
    pub employee_id: String,
    /// Gross base pay in whole currency units.
    pub base_pay: Decimal,
    /// The payroll month used to resolve rates.
    pub payroll_month: PayrollMonth,
    /// The tax treatment of the pay.
    pub tax_type: TaxType,
    /// Number of dependents, including the employee.
    #[serde(default = "default_dependents")]
    pub dependents_count: u32,
}

impl PayrollInput {
    /// Validates the amount and dependents count.
    pub fn validate(&self) -> EngineResult<()> {
        ensure_whole_amount("base_pay", self.base_pay)?;

        if self.dependents_count == 0 {
            return Err(EngineError::InvalidInput {
                field: "dependents_count".to_string(),
                message: "must be at least 1 (the employee counts as a dependent)".to_string(),
            });
        }

        Ok(())
    }
}

/// Rejects amounts that are negative or carry fractional currency units.
pub fn ensure_whole_amount(field: &str, amount: Decimal) -> EngineResult<()> {
    if amount < Decimal::ZERO {
        return Err(EngineError::InvalidAmount {
            field: field.to_string(),
            amount,
            message: "must not be negative".to_string(),
        });
    }

    if !amount.fract().is_zero() {
        return Err(EngineError::InvalidAmount {
            field: field.to_string(),
            amount,
            message: "must be a whole number of currency units".to_string(),
        });
    }

    Ok(())
}
