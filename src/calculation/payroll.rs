//! Payroll computation for one employee or a batch.
//!
//! This module wires rate resolution, the deduction calculators and the
//! aggregator together for a [`PayrollInput`].

use std::time::Instant;

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use super::{
    add_amounts, aggregate, calculate_freelancer_withholding, calculate_income_tax,
    calculate_insurance_with_audit, resolve_rates_with_audit,
};
use crate::config::PayrollConfig;
use crate::error::EngineResult;
use crate::models::{
    AuditStep, AuditTrace, AuditWarning, DeductionKind, Deductions, PayrollInput, PayrollResult,
    TaxType,
};

/// Computes one employee's payroll.
///
/// For [`TaxType::StatutoryFourInsurance`] the rates in force for the payroll
/// month are resolved, the four insurances and income taxes are deducted and
/// the employer matches the insurances. For [`TaxType::FlatWithholding`] only
/// the 3.3% withholding is deducted and the rate table is not consulted.
///
/// # Errors
///
/// - `InvalidAmount` if base pay is negative or fractional
/// - `InvalidInput` if the dependents count is zero
/// - `NoApplicableRate` if a statutory employee's month precedes every rate
///   record
///
/// A negative net pay is returned as a result with `negative_net_pay` set and
/// a `NEGATIVE_NET_PAY` warning.
pub fn calculate_payroll(
    input: &PayrollInput,
    config: &PayrollConfig,
) -> EngineResult<PayrollResult> {
    let start_time = Instant::now();
    input.validate()?;

    let mut steps: Vec<AuditStep> = Vec::new();
    let mut warnings: Vec<AuditWarning> = Vec::new();
    let mut step_number: u32 = 1;
    let mut deductions = Deductions::new();
    let mut applied_rate_month = None;

    match input.tax_type {
        TaxType::StatutoryFourInsurance => {
            let resolution =
                resolve_rates_with_audit(config.rates(), input.payroll_month, step_number)?;
            applied_rate_month = Some(resolution.record.effective_month);
            steps.push(resolution.audit_step);
            step_number += 1;

            let insurance =
                calculate_insurance_with_audit(input.base_pay, resolution.record, step_number)?;
            deductions.extend(insurance.contributions.to_deductions());
            step_number += insurance.audit_steps.len() as u32;
            steps.extend(insurance.audit_steps);

            let lookup = config.income_tax();
            if lookup.is_empty() {
                warnings.push(AuditWarning::income_tax_table_empty());
            }
            let income_tax = calculate_income_tax(
                input.base_pay,
                input.dependents_count,
                lookup,
                step_number,
            )?;
            deductions.insert(DeductionKind::IncomeTax, income_tax.income_tax);
            deductions.insert(DeductionKind::LocalIncomeTax, income_tax.local_income_tax);
            steps.push(income_tax.audit_step);
            step_number += 1;
        }
        TaxType::FlatWithholding => {
            let withholding = calculate_freelancer_withholding(input.base_pay, step_number)?;
            deductions.extend(withholding.to_deductions());
            steps.push(withholding.audit_step);
            step_number += 1;
        }
    }

    let aggregation = aggregate(input.base_pay, &deductions, step_number)?;
    let negative_net_pay = aggregation.is_negative_net_pay();
    steps.push(aggregation.audit_step);
    if let Some(warning) = aggregation.warning {
        warn!(
            employee_id = %input.employee_id,
            payroll_month = %input.payroll_month,
            net_pay = %aggregation.net_pay,
            "Negative net pay requires review"
        );
        warnings.push(warning);
    }

    let duration_us = start_time.elapsed().as_micros() as u64;
    debug!(
        employee_id = %input.employee_id,
        tax_type = input.tax_type.as_str(),
        net_pay = %aggregation.net_pay,
        duration_us,
        "Payroll calculated"
    );

    Ok(PayrollResult {
        calculation_id: Uuid::new_v4(),
        timestamp: Utc::now(),
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        employee_id: input.employee_id.clone(),
        payroll_month: input.payroll_month,
        tax_type: input.tax_type,
        base_pay: input.base_pay,
        applied_rate_month,
        deductions,
        total_deductions: aggregation.total_deductions,
        employer_burden: aggregation.employer_burden,
        net_pay: aggregation.net_pay,
        total_labor_cost: aggregation.total_labor_cost,
        negative_net_pay,
        audit_trace: AuditTrace {
            steps,
            warnings,
            duration_us,
        },
    })
}

/// Totals across the successful results of a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Number of inputs submitted.
    pub total: usize,
    /// Number of inputs calculated.
    pub succeeded: usize,
    /// Number of inputs rejected.
    pub failed: usize,
    /// Number of results with negative net pay.
    pub negative_net_pay: usize,
    /// Sum of base pay over successful results.
    pub total_base_pay: Decimal,
    /// Sum of net pay over successful results.
    pub total_net_pay: Decimal,
    /// Sum of labour cost over successful results.
    pub total_labor_cost: Decimal,
}

impl BatchSummary {
    /// Summarises a batch of outcomes.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAmount` if a batch total overflows.
    pub fn from_outcomes(outcomes: &[EngineResult<PayrollResult>]) -> EngineResult<Self> {
        let mut summary = Self {
            total: outcomes.len(),
            ..Self::default()
        };

        for outcome in outcomes {
            let Ok(result) = outcome else {
                summary.failed += 1;
                continue;
            };

            summary.succeeded += 1;
            if result.negative_net_pay {
                summary.negative_net_pay += 1;
            }
            summary.total_base_pay =
                add_amounts("total_base_pay", summary.total_base_pay, result.base_pay)?;
            summary.total_net_pay =
                add_amounts("total_net_pay", summary.total_net_pay, result.net_pay)?;
            summary.total_labor_cost = add_amounts(
                "total_labor_cost",
                summary.total_labor_cost,
                result.total_labor_cost,
            )?;
        }

        Ok(summary)
    }
}

/// Computes payroll for many employees.
///
/// Inputs are independent: one failing input never affects the others, and
/// outcomes are returned in input order.
pub fn calculate_batch(
    inputs: &[PayrollInput],
    config: &PayrollConfig,
) -> Vec<EngineResult<PayrollResult>> {
    inputs
        .iter()
        .map(|input| calculate_payroll(input, config))
        .collect()
}
