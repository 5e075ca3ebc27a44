//! Payroll aggregation.
//!
//! This module combines base pay and deductions into net pay, the employer
//! burden and the total labour cost.

use rust_decimal::Decimal;

use super::{add_amounts, subtract_amounts, sum_amounts};
use crate::error::EngineResult;
use crate::models::{AuditStep, AuditWarning, Deductions, ensure_whole_amount};

/// The aggregated payroll figures, including audit step and warning.
#[derive(Debug, Clone)]
pub struct Aggregation {
    /// Sum of all deductions.
    pub total_deductions: Decimal,
    /// Base pay less all deductions. May be negative.
    pub net_pay: Decimal,
    /// Employer matching contributions for the statutory insurances.
    pub employer_burden: Deductions,
    /// Base pay plus the employer burden.
    pub total_labor_cost: Decimal,
    /// Raised when net pay is negative; the caller decides whether to block.
    pub warning: Option<AuditWarning>,
    /// The audit step recording this aggregation.
    pub audit_step: AuditStep,
}

impl Aggregation {
    /// Returns true if net pay came out negative.
    pub fn is_negative_net_pay(&self) -> bool {
        self.net_pay < Decimal::ZERO
    }
}

/// Aggregates base pay and deductions.
///
/// - `net_pay = base_pay - sum(deductions)`
/// - `employer_burden` mirrors every statutory insurance deduction at equal
///   value; income tax and local income tax have no employer match.
/// - `total_labor_cost = base_pay + sum(employer_burden)`
///
/// A negative net pay is not an error: the result carries a
/// `NEGATIVE_NET_PAY` warning instead.
///
/// # Errors
///
/// Returns `InvalidAmount` if `base_pay` or any deduction is negative or
/// fractional, or if a total overflows.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::aggregate;
/// use payroll_engine::models::{DeductionKind, Deductions};
/// use rust_decimal::Decimal;
///
/// let deductions = Deductions::from([
///     (DeductionKind::NationalPension, Decimal::from(100)),
///     (DeductionKind::HealthInsurance, Decimal::from(50)),
///     (DeductionKind::IncomeTax, Decimal::from(20)),
/// ]);
///
/// let aggregation = aggregate(Decimal::from(1_000), &deductions, 1).unwrap();
/// assert_eq!(aggregation.net_pay, Decimal::from(830));
/// assert_eq!(aggregation.total_labor_cost, Decimal::from(1_150));
/// assert!(!aggregation.employer_burden.contains_key(&DeductionKind::IncomeTax));
/// ```
pub fn aggregate(
    base_pay: Decimal,
    deductions: &Deductions,
    step_number: u32,
) -> EngineResult<Aggregation> {
    ensure_whole_amount("base_pay", base_pay)?;
    for (kind, amount) in deductions {
        ensure_whole_amount(kind.as_str(), *amount)?;
    }

    let total_deductions = sum_amounts("total_deductions", deductions.values().copied())?;
    let net_pay = subtract_amounts("net_pay", base_pay, total_deductions)?;

    let employer_burden: Deductions = deductions
        .iter()
        .filter(|(kind, _)| kind.is_statutory_insurance())
        .map(|(kind, amount)| (*kind, *amount))
        .collect();
    let employer_total = sum_amounts("employer_burden", employer_burden.values().copied())?;
    let total_labor_cost = add_amounts("total_labor_cost", base_pay, employer_total)?;

    let warning = (net_pay < Decimal::ZERO).then(|| AuditWarning::negative_net_pay(net_pay));

    let deduction_lines: serde_json::Map<String, serde_json::Value> = deductions
        .iter()
        .map(|(kind, amount)| (kind.as_str().to_string(), amount.to_string().into()))
        .collect();

    let audit_step = AuditStep {
        step_number,
        rule_id: "payroll_aggregation".to_string(),
        rule_name: "Payroll Aggregation".to_string(),
        basis: "Employer matches each statutory insurance contribution".to_string(),
        input: serde_json::json!({
            "base_pay": base_pay.to_string(),
            "deductions": deduction_lines
        }),
        output: serde_json::json!({
            "total_deductions": total_deductions.to_string(),
            "net_pay": net_pay.to_string(),
            "employer_burden_total": employer_total.to_string(),
            "total_labor_cost": total_labor_cost.to_string()
        }),
        reasoning: format!(
            "{} - {} = {} net; {} + {} = {} labour cost",
            base_pay, total_deductions, net_pay, base_pay, employer_total, total_labor_cost
        ),
    };

    Ok(Aggregation {
        total_deductions,
        net_pay,
        employer_burden,
        total_labor_cost,
        warning,
        audit_step,
    })
}
