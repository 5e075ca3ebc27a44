//! Request types for the payroll engine API.
//!
//! This module defines the JSON request structures for the `/calculate` and
//! `/calculate/batch` endpoints.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{PayrollInput, PayrollMonth, TaxType};

/// Request body for the `/calculate` endpoint.
///
/// The payroll month is carried as a string so that a badly formed month is
/// reported as `INVALID_MONTH` rather than a JSON error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollRequest {
    /// Identifier of the employee.
    pub employee_id: String,
    /// Gross base pay in whole currency units.
    pub base_pay: Decimal,
    /// The payroll month as `YYYY-MM`.
    pub payroll_month: String,
    /// The tax treatment of the pay.
    pub tax_type: TaxType,
    /// Number of dependents, including the employee.
    #[serde(default = "crate::models::default_dependents")]
    pub dependents_count: u32,
}

/// Request body for the `/calculate/batch` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRequest {
    /// The payroll requests to compute, in order.
    pub items: Vec<PayrollRequest>,
}

impl TryFrom<PayrollRequest> for PayrollInput {
    type Error = EngineError;

    fn try_from(req: PayrollRequest) -> EngineResult<Self> {
        let payroll_month: PayrollMonth = req.payroll_month.parse()?;
        Ok(PayrollInput {
            employee_id: req.employee_id,
            base_pay: req.base_pay,
            payroll_month,
            tax_type: req.tax_type,
            dependents_count: req.dependents_count,
        })
    }
}
