//! Payroll result models.
//!
//! This module contains the [`PayrollResult`] type and its associated
//! structures that capture the outputs of a payroll computation: deductions,
//! employer burden, net pay, labour cost and an audit trace.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{PayrollMonth, TaxType};
use crate::calculation::sum_amounts;
use crate::error::EngineResult;

/// A named payroll deduction.
///
/// # Example
///
/// ```
/// use payroll_engine::models::DeductionKind;
///
/// assert!(DeductionKind::HealthInsurance.is_statutory_insurance());
/// assert!(!DeductionKind::IncomeTax.is_statutory_insurance());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeductionKind {
    /// National pension contribution.
    NationalPension,
    /// Health insurance contribution.
    HealthInsurance,
    /// Long-term care insurance, levied on the health insurance amount.
    LongTermCare,
    /// Employment insurance contribution.
    EmploymentInsurance,
    /// Income tax withheld.
    IncomeTax,
    /// Local income tax, a tenth of the income tax.
    LocalIncomeTax,
}

impl DeductionKind {
    /// The four statutory insurances, in payslip order.
    pub const STATUTORY_INSURANCES: [DeductionKind; 4] = [
        DeductionKind::NationalPension,
        DeductionKind::HealthInsurance,
        DeductionKind::LongTermCare,
        DeductionKind::EmploymentInsurance,
    ];

    /// Returns true for deductions the employer matches.
    pub fn is_statutory_insurance(&self) -> bool {
        Self::STATUTORY_INSURANCES.contains(self)
    }

    /// Returns the wire name of the deduction.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeductionKind::NationalPension => "national_pension",
            DeductionKind::HealthInsurance => "health_insurance",
            DeductionKind::LongTermCare => "long_term_care",
            DeductionKind::EmploymentInsurance => "employment_insurance",
            DeductionKind::IncomeTax => "income_tax",
            DeductionKind::LocalIncomeTax => "local_income_tax",
        }
    }
}

/// Deduction amounts keyed by kind, in a stable order.
pub type Deductions = BTreeMap<DeductionKind, Decimal>;

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The statute or convention the rule follows.
    pub basis: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during calculation.
///
/// Warnings flag results that need human review but do not block the
/// calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

impl AuditWarning {
    /// Code of the warning raised when deductions exceed base pay.
    pub const NEGATIVE_NET_PAY: &'static str = "NEGATIVE_NET_PAY";

    /// Code of the warning raised when no income tax table is configured.
    pub const INCOME_TAX_TABLE_EMPTY: &'static str = "INCOME_TAX_TABLE_EMPTY";

    /// Builds the negative net pay warning.
    pub fn negative_net_pay(net_pay: Decimal) -> Self {
        Self {
            code: Self::NEGATIVE_NET_PAY.to_string(),
            message: format!(
                "Net pay is {} after deductions; review before finalizing",
                net_pay
            ),
            severity: "high".to_string(),
        }
    }

    /// Builds the empty income tax table warning.
    pub fn income_tax_table_empty() -> Self {
        Self {
            code: Self::INCOME_TAX_TABLE_EMPTY.to_string(),
            message: "No income tax brackets configured; income tax withheld as 0".to_string(),
            severity: "medium".to_string(),
        }
    }
}

/// The complete audit trace for a calculation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
    /// The total calculation duration in microseconds.
    pub duration_us: u64,
}

impl AuditTrace {
    /// Returns true if a warning with the given code was raised.
    pub fn has_warning(&self, code: &str) -> bool {
        self.warnings.iter().any(|w| w.code == code)
    }
}

/// The complete result of a payroll computation.
///
/// Results are not persisted by the engine; the presentation and
/// persistence layers consume them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollResult {
    /// Unique identifier for this calculation.
    pub calculation_id: Uuid,
    /// When the calculation was performed.
    pub timestamp: DateTime<Utc>,
    /// The version of the engine that performed the calculation.
    pub engine_version: String,
    /// The ID of the employee the calculation is for.
    pub employee_id: String,
    /// The payroll month computed.
    pub payroll_month: PayrollMonth,
    /// The tax treatment applied.
    pub tax_type: TaxType,
    /// Gross base pay.
    pub base_pay: Decimal,
    /// Effective month of the rate record used, if rates were consulted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applied_rate_month: Option<PayrollMonth>,
    /// Employee-side deductions.
    pub deductions: Deductions,
    /// Sum of all deductions.
    pub total_deductions: Decimal,
    /// Employer-matched contributions for the statutory insurances.
    pub employer_burden: Deductions,
    /// Base pay minus all deductions. May be negative.
    pub net_pay: Decimal,
    /// Base pay plus employer burden.
    pub total_labor_cost: Decimal,
    /// Set when net pay is negative and the result needs review.
    pub negative_net_pay: bool,
    /// Complete audit trace of calculation decisions.
    pub audit_trace: AuditTrace,
}

impl PayrollResult {
    /// Returns the amount of a deduction, or zero if it does not apply.
    pub fn deduction(&self, kind: DeductionKind) -> Decimal {
        self.deductions.get(&kind).copied().unwrap_or(Decimal::ZERO)
    }

    /// Returns the sum of the employer burden.
    pub fn employer_burden_total(&self) -> EngineResult<Decimal> {
        sum_amounts("employer_burden", self.employer_burden.values().copied())
    }
}
