//! Rate resolution.
//!
//! This module selects the statutory rate record in force for a payroll
//! month.

use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, PayrollMonth, RateRecord};

/// The result of a rate resolution, including the record and audit step.
#[derive(Debug, Clone)]
pub struct RateResolution<'a> {
    /// The record in force for the target month.
    pub record: &'a RateRecord,
    /// The audit step recording this lookup.
    pub audit_step: AuditStep,
}

/// Selects the rate record in force for `target`.
///
/// Among the records whose effective month is on or before `target`, the one
/// with the latest effective month wins. The table does not need to be
/// sorted. When two records share the winning month the later one in the
/// slice is returned; [`crate::config::ConfigLoader`] rejects such tables.
///
/// # Errors
///
/// Returns `NoApplicableRate` when `target` precedes every record. The
/// engine never falls back to a default record.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::resolve_rates;
/// use payroll_engine::models::RateRecord;
/// use rust_decimal::Decimal;
///
/// let record = |month: &str| RateRecord {
///     effective_month: month.parse().unwrap(),
///     national_pension_rate: Decimal::new(45, 3),
///     health_insurance_rate: Decimal::new(3545, 5),
///     long_term_care_rate_of_health: Decimal::new(1295, 4),
///     employment_insurance_rate: Decimal::new(9, 3),
///     national_pension_min: Decimal::from(390_000),
///     national_pension_max: Decimal::from(6_170_000),
/// };
/// let table = vec![record("2025-01"), record("2026-01")];
///
/// let resolved = resolve_rates(&table, "2025-06".parse().unwrap()).unwrap();
/// assert_eq!(resolved.effective_month.to_string(), "2025-01");
/// ```
pub fn resolve_rates(table: &[RateRecord], target: PayrollMonth) -> EngineResult<&RateRecord> {
    table
        .iter()
        .filter(|record| record.effective_month <= target)
        .max_by_key(|record| record.effective_month)
        .ok_or_else(|| EngineError::NoApplicableRate {
            month: target.to_string(),
            earliest: table
                .iter()
                .map(|record| record.effective_month)
                .min()
                .map(|month| month.to_string()),
        })
}

/// Resolves the rate record for `target` and records an audit step.
pub fn resolve_rates_with_audit(
    table: &[RateRecord],
    target: PayrollMonth,
    step_number: u32,
) -> EngineResult<RateResolution<'_>> {
    let record = resolve_rates(table, target)?;

    let audit_step = AuditStep {
        step_number,
        rule_id: "rate_resolution".to_string(),
        rule_name: "Rate Resolution".to_string(),
        basis: "Latest rate record effective on or before the payroll month".to_string(),
        input: serde_json::json!({
            "payroll_month": target.to_string(),
            "records_available": table.len()
        }),
        output: serde_json::json!({
            "effective_month": record.effective_month.to_string(),
            "national_pension_rate": record.national_pension_rate.normalize().to_string(),
            "health_insurance_rate": record.health_insurance_rate.normalize().to_string(),
            "long_term_care_rate_of_health":
                record.long_term_care_rate_of_health.normalize().to_string(),
            "employment_insurance_rate": record.employment_insurance_rate.normalize().to_string()
        }),
        reasoning: format!(
            "Rates effective {} apply to payroll month {}",
            record.effective_month, target
        ),
    };

    Ok(RateResolution { record, audit_step })
}
