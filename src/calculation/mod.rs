//! Calculation logic for the payroll engine.
//!
//! This module contains the calculation functions for a monthly payroll:
//! rate resolution by payroll month, the four statutory insurances,
//! income tax lookup, freelancer withholding, and aggregation into net pay
//! and labour cost.

mod freelancer_withholding;
mod income_tax;
mod insurance;
mod payroll;
mod payroll_aggregator;
mod rate_resolver;
mod rounding;

pub use freelancer_withholding::{
    WithholdingResult, calculate_freelancer_withholding, freelancer_income_tax_rate,
};
pub use income_tax::{
    IncomeTaxBracket, IncomeTaxLookup, IncomeTaxResult, IncomeTaxTable, calculate_income_tax,
    calculate_local_income_tax, local_income_tax_rate,
};
pub use insurance::{
    InsuranceContributions, InsuranceResult, calculate_insurance, calculate_insurance_with_audit,
};
pub use payroll::{BatchSummary, calculate_batch, calculate_payroll};
pub use payroll_aggregator::{Aggregation, aggregate};
pub use rate_resolver::{RateResolution, resolve_rates, resolve_rates_with_audit};
pub use rounding::{add_amounts, floor_product, subtract_amounts, sum_amounts};
