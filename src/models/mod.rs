//! Core data models for the payroll engine.
//!
//! This module contains all the domain models used throughout the engine.

mod payroll_input;
mod payroll_month;
mod payroll_result;
mod rate_record;

pub(crate) use payroll_input::default_dependents;
pub use payroll_input::{PayrollInput, TaxType, ensure_whole_amount};
pub use payroll_month::PayrollMonth;
pub use payroll_result::{
    AuditStep, AuditTrace, AuditWarning, DeductionKind, Deductions, PayrollResult,
};
pub use rate_record::RateRecord;
