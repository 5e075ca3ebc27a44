//! Freelancer withholding calculation.
//!
//! Contract workers are not enrolled in the statutory insurances. Instead a
//! flat 3% income tax plus 10% of that as local income tax (3.3% combined)
//! is withheld from their pay.

use rust_decimal::Decimal;

use super::{add_amounts, calculate_local_income_tax, floor_product, subtract_amounts};
use crate::error::EngineResult;
use crate::models::{AuditStep, DeductionKind, Deductions, ensure_whole_amount};

/// Returns the freelancer income tax rate (3%).
pub fn freelancer_income_tax_rate() -> Decimal {
    Decimal::new(3, 2)
}

/// The result of the flat withholding calculation.
#[derive(Debug, Clone)]
pub struct WithholdingResult {
    /// Income tax withheld, `floor(base_pay * 0.03)`.
    pub income_tax: Decimal,
    /// Local income tax withheld, `floor(income_tax * 0.1)`.
    pub local_income_tax: Decimal,
    /// Base pay less both taxes.
    pub net_pay: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

impl WithholdingResult {
    /// Returns the two taxes as a deduction map.
    pub fn to_deductions(&self) -> Deductions {
        Deductions::from([
            (DeductionKind::IncomeTax, self.income_tax),
            (DeductionKind::LocalIncomeTax, self.local_income_tax),
        ])
    }
}

/// Computes the flat 3.3% withholding for a freelancer.
///
/// The calculation is independent of the rate table.
///
/// # Errors
///
/// Returns `InvalidAmount` if `base_pay` is negative or fractional.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_freelancer_withholding;
/// use rust_decimal::Decimal;
///
/// let result = calculate_freelancer_withholding(Decimal::from(1_000_000), 1).unwrap();
/// assert_eq!(result.income_tax, Decimal::from(30_000));
/// assert_eq!(result.local_income_tax, Decimal::from(3_000));
/// assert_eq!(result.net_pay, Decimal::from(967_000));
/// ```
pub fn calculate_freelancer_withholding(
    base_pay: Decimal,
    step_number: u32,
) -> EngineResult<WithholdingResult> {
    ensure_whole_amount("base_pay", base_pay)?;

    let rate = freelancer_income_tax_rate();
    let income_tax = floor_product("base_pay", base_pay, rate)?;
    let local_income_tax = calculate_local_income_tax(income_tax)?;
    let withheld = add_amounts("income_tax", income_tax, local_income_tax)?;
    let net_pay = subtract_amounts("net_pay", base_pay, withheld)?;

    let audit_step = AuditStep {
        step_number,
        rule_id: "freelancer_withholding".to_string(),
        rule_name: "Freelancer Withholding (3.3%)".to_string(),
        basis: "Business income withholding at 3% plus 10% local income tax".to_string(),
        input: serde_json::json!({
            "base_pay": base_pay.to_string(),
            "income_tax_rate": rate.normalize().to_string()
        }),
        output: serde_json::json!({
            "income_tax": income_tax.to_string(),
            "local_income_tax": local_income_tax.to_string(),
            "net_pay": net_pay.to_string()
        }),
        reasoning: format!(
            "floor({} x 0.03) = {}; floor({} x 0.1) = {}",
            base_pay, income_tax, income_tax, local_income_tax
        ),
    };

    Ok(WithholdingResult {
        income_tax,
        local_income_tax,
        net_pay,
        audit_step,
    })
}
