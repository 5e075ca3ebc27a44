//! Configuration types for payroll calculation.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files, and the validated
//! [`PayrollConfig`] built from them.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::calculation::{IncomeTaxBracket, IncomeTaxLookup};
use crate::error::{EngineError, EngineResult};
use crate::models::RateRecord;

/// Metadata about the jurisdiction whose rules are configured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollMetadata {
    /// Short code for the rule set (e.g., "KR-4INS").
    pub code: String,
    /// The human-readable name of the rule set.
    pub name: String,
    /// ISO currency code amounts are expressed in.
    pub currency: String,
    /// The version of the configuration.
    pub version: String,
}

/// Income tax configuration file structure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IncomeTaxConfig {
    /// Brackets of the simplified monthly income tax table.
    #[serde(default)]
    pub brackets: Vec<IncomeTaxBracket>,
}

/// The complete payroll configuration.
///
/// Rate records are validated and kept sorted by effective month, oldest
/// first. At most one record exists per effective month.
#[derive(Debug, Clone)]
pub struct PayrollConfig {
    /// Jurisdiction metadata.
    metadata: PayrollMetadata,
    /// Rate records sorted by effective month.
    rates: Vec<RateRecord>,
    /// Income tax lookup for statutory employees.
    income_tax: Arc<dyn IncomeTaxLookup>,
}

impl PayrollConfig {
    /// Creates a new PayrollConfig from its component parts.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRateRecord` if any record fails validation or two
    /// records share an effective month.
    pub fn new(
        metadata: PayrollMetadata,
        rates: Vec<RateRecord>,
        income_tax: Arc<dyn IncomeTaxLookup>,
    ) -> EngineResult<Self> {
        let mut seen = HashSet::new();
        for record in &rates {
            record.validate()?;
            if !seen.insert(record.effective_month) {
                return Err(EngineError::InvalidRateRecord {
                    effective_month: record.effective_month.to_string(),
                    message: "duplicate effective month".to_string(),
                });
            }
        }

        let mut sorted_rates = rates;
        sorted_rates.sort_by_key(|r| r.effective_month);

        Ok(Self {
            metadata,
            rates: sorted_rates,
            income_tax,
        })
    }

    /// Returns the jurisdiction metadata.
    pub fn metadata(&self) -> &PayrollMetadata {
        &self.metadata
    }

    /// Returns all rate records, oldest first.
    pub fn rates(&self) -> &[RateRecord] {
        &self.rates
    }

    /// Returns the income tax lookup.
    pub fn income_tax(&self) -> &dyn IncomeTaxLookup {
        self.income_tax.as_ref()
    }
}
