//! Income tax lookup for statutory employees.
//!
//! Monthly income tax withheld from regular employees comes from a simplified
//! tax table keyed by monthly pay and number of dependents. This module
//! defines the lookup seam and the bracket table loaded from configuration,
//! plus the local income tax rule shared with freelancer withholding.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::floor_product;
use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, ensure_whole_amount};

/// Returns the local income tax rate, 10% of the income tax.
pub fn local_income_tax_rate() -> Decimal {
    Decimal::new(1, 1)
}

/// Computes local income tax as `floor(income_tax * 0.1)`.
pub fn calculate_local_income_tax(income_tax: Decimal) -> EngineResult<Decimal> {
    floor_product("income_tax", income_tax, local_income_tax_rate())
}

/// Source of monthly income tax amounts for statutory employees.
///
/// The engine ships [`IncomeTaxTable`]; callers with a full statutory table
/// can supply their own implementation.
pub trait IncomeTaxLookup: std::fmt::Debug + Send + Sync {
    /// Returns the income tax withheld for `taxable_pay` with `dependents`
    /// dependents (including the employee).
    fn monthly_income_tax(&self, taxable_pay: Decimal, dependents: u32) -> EngineResult<Decimal>;

    /// Returns true if the lookup has no data and always yields zero.
    fn is_empty(&self) -> bool {
        false
    }
}

/// One row of the simplified income tax table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeTaxBracket {
    /// Lower bound of monthly pay, inclusive.
    pub from: Decimal,
    /// Upper bound of monthly pay, exclusive.
    pub to: Decimal,
    /// Tax amount indexed by dependents count minus one.
    pub tax_by_dependents: Vec<Decimal>,
}

/// A bracketed monthly income tax table.
///
/// - Pay below the first bracket is tax free.
/// - Pay at or above the last bracket's upper bound uses the last bracket.
/// - A dependents count beyond the listed columns uses the last column.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::{IncomeTaxBracket, IncomeTaxLookup, IncomeTaxTable};
/// use rust_decimal::Decimal;
///
/// let table = IncomeTaxTable::new(vec![IncomeTaxBracket {
///     from: Decimal::from(2_000_000),
///     to: Decimal::from(3_000_000),
///     tax_by_dependents: vec![Decimal::from(40_000), Decimal::from(25_000)],
/// }])
/// .unwrap();
///
/// let tax = table.monthly_income_tax(Decimal::from(2_500_000), 2).unwrap();
/// assert_eq!(tax, Decimal::from(25_000));
/// let tax = table.monthly_income_tax(Decimal::from(1_000_000), 1).unwrap();
/// assert_eq!(tax, Decimal::ZERO);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IncomeTaxTable {
    brackets: Vec<IncomeTaxBracket>,
}

impl IncomeTaxTable {
    /// Builds a table, sorting brackets and checking they neither overlap nor
    /// carry empty or negative columns.
    pub fn new(mut brackets: Vec<IncomeTaxBracket>) -> EngineResult<Self> {
        brackets.sort_by(|a, b| a.from.cmp(&b.from));

        for bracket in &brackets {
            if bracket.from >= bracket.to {
                return Err(invalid_bracket(bracket, "lower bound must be below upper bound"));
            }
            if bracket.tax_by_dependents.is_empty() {
                return Err(invalid_bracket(bracket, "no tax amounts listed"));
            }
            if bracket.tax_by_dependents.iter().any(|t| *t < Decimal::ZERO) {
                return Err(invalid_bracket(bracket, "tax amounts must not be negative"));
            }
        }

        for pair in brackets.windows(2) {
            if pair[1].from < pair[0].to {
                return Err(invalid_bracket(&pair[1], "overlaps the previous bracket"));
            }
        }

        Ok(Self { brackets })
    }

    /// Returns the brackets, sorted by lower bound.
    pub fn brackets(&self) -> &[IncomeTaxBracket] {
        &self.brackets
    }

    fn bracket_for(&self, pay: Decimal) -> Option<&IncomeTaxBracket> {
        let first = self.brackets.first()?;
        if pay < first.from {
            return None;
        }
        self.brackets
            .iter()
            .find(|b| b.from <= pay && pay < b.to)
            .or_else(|| self.brackets.iter().rev().find(|b| b.from <= pay))
    }
}

fn invalid_bracket(bracket: &IncomeTaxBracket, message: &str) -> EngineError {
    EngineError::InvalidInput {
        field: "income_tax.brackets".to_string(),
        message: format!("bracket {}..{}: {}", bracket.from, bracket.to, message),
    }
}

impl IncomeTaxLookup for IncomeTaxTable {
    fn monthly_income_tax(&self, taxable_pay: Decimal, dependents: u32) -> EngineResult<Decimal> {
        ensure_whole_amount("taxable_pay", taxable_pay)?;
        if dependents == 0 {
            return Err(EngineError::InvalidInput {
                field: "dependents_count".to_string(),
                message: "must be at least 1 (the employee counts as a dependent)".to_string(),
            });
        }

        let Some(bracket) = self.bracket_for(taxable_pay) else {
            return Ok(Decimal::ZERO);
        };

        let column = (dependents as usize - 1).min(bracket.tax_by_dependents.len() - 1);
        Ok(bracket.tax_by_dependents[column].floor())
    }

    fn is_empty(&self) -> bool {
        self.brackets.is_empty()
    }
}

/// The result of the income tax step for a statutory employee.
#[derive(Debug, Clone)]
pub struct IncomeTaxResult {
    /// Income tax withheld.
    pub income_tax: Decimal,
    /// Local income tax withheld.
    pub local_income_tax: Decimal,
    /// The audit step recording this lookup.
    pub audit_step: AuditStep,
}

/// Looks up income tax and derives local income tax, recording an audit step.
pub fn calculate_income_tax(
    taxable_pay: Decimal,
    dependents: u32,
    lookup: &dyn IncomeTaxLookup,
    step_number: u32,
) -> EngineResult<IncomeTaxResult> {
    let income_tax = lookup.monthly_income_tax(taxable_pay, dependents)?;
    let local_income_tax = calculate_local_income_tax(income_tax)?;

    let audit_step = AuditStep {
        step_number,
        rule_id: "income_tax".to_string(),
        rule_name: "Income Tax Withholding".to_string(),
        basis: "Simplified monthly income tax table; local income tax at 10% of income tax"
            .to_string(),
        input: serde_json::json!({
            "taxable_pay": taxable_pay.to_string(),
            "dependents_count": dependents
        }),
        output: serde_json::json!({
            "income_tax": income_tax.to_string(),
            "local_income_tax": local_income_tax.to_string()
        }),
        reasoning: format!(
            "Table tax {} for {} dependent(s); local tax floor({} x 0.1) = {}",
            income_tax, dependents, income_tax, local_income_tax
        ),
    };

    Ok(IncomeTaxResult {
        income_tax,
        local_income_tax,
        audit_step,
    })
}
