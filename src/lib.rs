//! Statutory payroll deduction engine.
//!
//! This crate resolves the statutory contribution rates in force for a payroll
//! month and computes an employee's four statutory insurances (national
//! pension, health insurance, long-term care, employment insurance), income
//! tax, or the flat 3.3% freelancer withholding, then aggregates them into
//! net pay, employer burden and total labour cost.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
