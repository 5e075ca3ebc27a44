//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading payroll
//! configurations from YAML files.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::calculation::{IncomeTaxLookup, IncomeTaxTable, resolve_rates};
use crate::error::{EngineError, EngineResult};
use crate::models::{PayrollMonth, RateRecord};

use super::types::{IncomeTaxConfig, PayrollConfig, PayrollMetadata};

/// Loads and provides access to payroll configuration.
///
/// The `ConfigLoader` reads YAML configuration files from a directory
/// and provides methods to query rate records and the income tax table.
///
/// # Directory Structure
///
/// The configuration directory should have the following structure:
/// ```text
/// config/kr/
/// ├── payroll.yaml        # Jurisdiction metadata
/// ├── income_tax.yaml     # Simplified income tax table (optional)
/// └── rates/
///     └── 2025-01.yaml    # Rates effective from this month
/// ```
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/kr").unwrap();
///
/// let month = "2025-08".parse().unwrap();
/// let rates = loader.resolve_rates(month).unwrap();
/// println!("Health insurance rate: {}", rates.health_insurance_rate);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: PayrollConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration directory (e.g., "./config/kr")
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - `payroll.yaml` or the `rates` directory is missing
    /// - Any file contains invalid YAML
    /// - Any rate record is invalid or two share an effective month
    ///
    /// # Example
    ///
    /// ```no_run
    /// use payroll_engine::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::load("./config/kr")?;
    /// # Ok::<(), payroll_engine::error::EngineError>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        // Load payroll.yaml
        let metadata_path = path.join("payroll.yaml");
        let metadata = Self::load_yaml::<PayrollMetadata>(&metadata_path)?;

        // Load all rate files from the rates directory
        let rates_dir = path.join("rates");
        let rates = Self::load_rates(&rates_dir)?;

        // income_tax.yaml is optional; without it income tax is withheld as zero
        let income_tax_path = path.join("income_tax.yaml");
        let income_tax_config = if income_tax_path.exists() {
            Self::load_yaml::<IncomeTaxConfig>(&income_tax_path)?
        } else {
            IncomeTaxConfig::default()
        };
        let income_tax = IncomeTaxTable::new(income_tax_config.brackets).map_err(|e| {
            EngineError::ConfigParseError {
                path: income_tax_path.display().to_string(),
                message: e.to_string(),
            }
        })?;

        let loader = Self::from_parts(metadata, rates, Arc::new(income_tax))?;

        info!(
            code = %loader.metadata().code,
            version = %loader.metadata().version,
            rate_records = loader.rate_table().len(),
            path = %path.display(),
            "Payroll configuration loaded"
        );

        Ok(loader)
    }

    /// Builds a loader from data supplied by another source, such as a
    /// database snapshot of the rate table.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRateRecord` if any record is invalid or two records
    /// share an effective month.
    pub fn from_parts(
        metadata: PayrollMetadata,
        rates: Vec<RateRecord>,
        income_tax: Arc<dyn IncomeTaxLookup>,
    ) -> EngineResult<Self> {
        let config = PayrollConfig::new(metadata, rates, income_tax)?;
        Ok(Self { config })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Loads all rate files from the rates directory.
    fn load_rates(rates_dir: &Path) -> EngineResult<Vec<RateRecord>> {
        let rates_dir_str = rates_dir.display().to_string();

        if !rates_dir.exists() {
            return Err(EngineError::ConfigNotFound {
                path: rates_dir_str,
            });
        }

        let entries = fs::read_dir(rates_dir).map_err(|_| EngineError::ConfigNotFound {
            path: rates_dir_str.clone(),
        })?;

        let mut rates = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: rates_dir_str.clone(),
            })?;

            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yaml") {
                let record = Self::load_yaml::<RateRecord>(&path)?;
                rates.push(record);
            }
        }

        if rates.is_empty() {
            return Err(EngineError::ConfigNotFound {
                path: format!("{} (no rate files found)", rates_dir_str),
            });
        }

        Ok(rates)
    }

    /// Returns the underlying payroll configuration.
    pub fn config(&self) -> &PayrollConfig {
        &self.config
    }

    /// Returns the jurisdiction metadata.
    pub fn metadata(&self) -> &PayrollMetadata {
        self.config.metadata()
    }

    /// Returns the rate table, oldest record first.
    pub fn rate_table(&self) -> &[RateRecord] {
        self.config.rates()
    }

    /// Gets the rate record in force for a payroll month.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use payroll_engine::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::load("./config/kr")?;
    /// let rates = loader.resolve_rates("2025-08".parse()?)?;
    /// println!("Effective {}", rates.effective_month);
    /// # Ok::<(), payroll_engine::error::EngineError>(())
    /// ```
    pub fn resolve_rates(&self, month: PayrollMonth) -> EngineResult<&RateRecord> {
        resolve_rates(self.config.rates(), month)
    }

    /// Returns the income tax lookup.
    pub fn income_tax(&self) -> &dyn IncomeTaxLookup {
        self.config.income_tax()
    }
}
