//! Statutory four-insurance calculation.
//!
//! This module computes the employee-side contributions for national
//! pension, health insurance, long-term care and employment insurance from
//! a base pay and a resolved [`RateRecord`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{floor_product, sum_amounts};
use crate::error::EngineResult;
use crate::models::{AuditStep, DeductionKind, Deductions, RateRecord, ensure_whole_amount};

/// Employee-side contributions for the four statutory insurances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsuranceContributions {
    /// National pension, on the clamped pension base.
    pub national_pension: Decimal,
    /// Health insurance, on base pay.
    pub health_insurance: Decimal,
    /// Long-term care, on the health insurance amount.
    pub long_term_care: Decimal,
    /// Employment insurance, on base pay.
    pub employment_insurance: Decimal,
}

impl InsuranceContributions {
    /// Sum of the four contributions.
    pub fn total(&self) -> EngineResult<Decimal> {
        sum_amounts(
            "insurance_total",
            [
                self.national_pension,
                self.health_insurance,
                self.long_term_care,
                self.employment_insurance,
            ],
        )
    }

    /// Returns the contributions as a deduction map.
    pub fn to_deductions(&self) -> Deductions {
        Deductions::from([
            (DeductionKind::NationalPension, self.national_pension),
            (DeductionKind::HealthInsurance, self.health_insurance),
            (DeductionKind::LongTermCare, self.long_term_care),
            (DeductionKind::EmploymentInsurance, self.employment_insurance),
        ])
    }
}

/// The result of the four-insurance calculation, including audit steps.
#[derive(Debug, Clone)]
pub struct InsuranceResult {
    /// The computed contributions.
    pub contributions: InsuranceContributions,
    /// One audit step per line item, in payslip order.
    pub audit_steps: Vec<AuditStep>,
}

/// Computes the four statutory insurance contributions.
///
/// - National pension: `floor(clamp(base_pay, min, max) * national_pension_rate)`
/// - Health insurance: `floor(base_pay * health_insurance_rate)`
/// - Long-term care: `floor(health_insurance * long_term_care_rate_of_health)`
/// - Employment insurance: `floor(base_pay * employment_insurance_rate)`
///
/// Long-term care is levied on the already floored health insurance amount,
/// never on base pay. Each line is floored independently.
///
/// # Errors
///
/// Returns `InvalidAmount` if `base_pay` is negative or fractional.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_insurance;
/// use payroll_engine::models::RateRecord;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let rates = RateRecord {
///     effective_month: "2025-01".parse().unwrap(),
///     national_pension_rate: Decimal::from_str("0.045").unwrap(),
///     health_insurance_rate: Decimal::from_str("0.03545").unwrap(),
///     long_term_care_rate_of_health: Decimal::from_str("0.1281").unwrap(),
///     employment_insurance_rate: Decimal::from_str("0.009").unwrap(),
///     national_pension_min: Decimal::from(370_000),
///     national_pension_max: Decimal::from(5_900_000),
/// };
///
/// let contributions = calculate_insurance(Decimal::from(2_500_000), &rates).unwrap();
/// assert_eq!(contributions.health_insurance, Decimal::from(88_625));
/// assert_eq!(contributions.long_term_care, Decimal::from(11_352));
/// ```
pub fn calculate_insurance(
    base_pay: Decimal,
    rates: &RateRecord,
) -> EngineResult<InsuranceContributions> {
    ensure_whole_amount("base_pay", base_pay)?;

    let pension_base = pension_base(base_pay, rates);
    let national_pension = floor_product("base_pay", pension_base, rates.national_pension_rate)?;
    let health_insurance = floor_product("base_pay", base_pay, rates.health_insurance_rate)?;
    let long_term_care = floor_product(
        "health_insurance",
        health_insurance,
        rates.long_term_care_rate_of_health,
    )?;
    let employment_insurance =
        floor_product("base_pay", base_pay, rates.employment_insurance_rate)?;

    Ok(InsuranceContributions {
        national_pension,
        health_insurance,
        long_term_care,
        employment_insurance,
    })
}

/// Clamps base pay into the pension income bounds.
fn pension_base(base_pay: Decimal, rates: &RateRecord) -> Decimal {
    base_pay
        .max(rates.national_pension_min)
        .min(rates.national_pension_max)
}

/// Computes the four statutory insurances and records one audit step per
/// line item, numbered from `step_number`.
pub fn calculate_insurance_with_audit(
    base_pay: Decimal,
    rates: &RateRecord,
    step_number: u32,
) -> EngineResult<InsuranceResult> {
    let contributions = calculate_insurance(base_pay, rates)?;
    let pension_base = pension_base(base_pay, rates);
    let effective = rates.effective_month.to_string();

    let audit_steps = vec![
        AuditStep {
            step_number,
            rule_id: "national_pension".to_string(),
            rule_name: "National Pension".to_string(),
            basis: "National Pension Act: income base clamped to the monthly bounds".to_string(),
            input: serde_json::json!({
                "base_pay": base_pay.to_string(),
                "pension_min": rates.national_pension_min.to_string(),
                "pension_max": rates.national_pension_max.to_string(),
                "rate": rates.national_pension_rate.normalize().to_string(),
                "rates_effective": effective
            }),
            output: serde_json::json!({
                "pension_base": pension_base.to_string(),
                "amount": contributions.national_pension.to_string(),
                "clamped": pension_base != base_pay
            }),
            reasoning: format!(
                "floor({} x {}) = {}",
                pension_base,
                rates.national_pension_rate.normalize(),
                contributions.national_pension
            ),
        },
        AuditStep {
            step_number: step_number + 1,
            rule_id: "health_insurance".to_string(),
            rule_name: "Health Insurance".to_string(),
            basis: "National Health Insurance Act: employee share of the premium".to_string(),
            input: serde_json::json!({
                "base_pay": base_pay.to_string(),
                "rate": rates.health_insurance_rate.normalize().to_string()
            }),
            output: serde_json::json!({
                "amount": contributions.health_insurance.to_string()
            }),
            reasoning: format!(
                "floor({} x {}) = {}",
                base_pay,
                rates.health_insurance_rate.normalize(),
                contributions.health_insurance
            ),
        },
        AuditStep {
            step_number: step_number + 2,
            rule_id: "long_term_care".to_string(),
            rule_name: "Long-Term Care Insurance".to_string(),
            basis: "Long-Term Care Insurance Act: levied on the health insurance amount"
                .to_string(),
            input: serde_json::json!({
                "health_insurance": contributions.health_insurance.to_string(),
                "rate_of_health": rates.long_term_care_rate_of_health.normalize().to_string()
            }),
            output: serde_json::json!({
                "amount": contributions.long_term_care.to_string()
            }),
            reasoning: format!(
                "floor({} x {}) = {}",
                contributions.health_insurance,
                rates.long_term_care_rate_of_health.normalize(),
                contributions.long_term_care
            ),
        },
        AuditStep {
            step_number: step_number + 3,
            rule_id: "employment_insurance".to_string(),
            rule_name: "Employment Insurance".to_string(),
            basis: "Employment Insurance Act: employee share of unemployment benefit premium"
                .to_string(),
            input: serde_json::json!({
                "base_pay": base_pay.to_string(),
                "rate": rates.employment_insurance_rate.normalize().to_string()
            }),
            output: serde_json::json!({
                "amount": contributions.employment_insurance.to_string()
            }),
            reasoning: format!(
                "floor({} x {}) = {}",
                base_pay,
                rates.employment_insurance_rate.normalize(),
                contributions.employment_insurance
            ),
        },
    ];

    Ok(InsuranceResult {
        contributions,
        audit_steps,
    })
}
