//! Error types for the payroll engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while resolving rates and
//! computing deductions.

use rust_decimal::Decimal;
use thiserror::Error;

/// The main error type for the payroll engine.
///
/// Every fallible operation in the engine returns this error type. A negative
/// net pay is deliberately absent: it is reported as a warning on the result.
///
/// # Example
///
/// ```
/// use payroll_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/payroll.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/payroll.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A monetary amount was negative or not a whole number of currency units.
    #[error("Invalid amount for '{field}' ({amount}): {message}")]
    InvalidAmount {
        /// The field carrying the amount.
        field: String,
        /// The rejected amount.
        amount: Decimal,
        /// A description of what made the amount invalid.
        message: String,
    },

    /// The payroll month precedes every record in the rate table.
    #[error("No applicable rate record for {month}{}", earliest_hint(.earliest))]
    NoApplicableRate {
        /// The requested payroll month.
        month: String,
        /// The earliest effective month known, if the table is not empty.
        earliest: Option<String>,
    },

    /// A month token was not of the form `YYYY-MM`.
    #[error("Invalid payroll month '{value}': expected YYYY-MM")]
    InvalidMonth {
        /// The rejected token.
        value: String,
    },

    /// A rate record was inconsistent.
    #[error("Invalid rate record effective {effective_month}: {message}")]
    InvalidRateRecord {
        /// The effective month of the offending record.
        effective_month: String,
        /// A description of the inconsistency.
        message: String,
    },

    /// A non-monetary input field was invalid.
    #[error("Invalid input field '{field}': {message}")]
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },
}

fn earliest_hint(earliest: &Option<String>) -> String {
    match earliest {
        Some(month) => format!(" (earliest record is effective {})", month),
        None => " (rate table is empty)".to_string(),
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
