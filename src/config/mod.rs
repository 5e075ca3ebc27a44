//! Configuration loading and management for the payroll engine.
//!
//! This module provides functionality to load payroll configurations from
//! YAML files, including jurisdiction metadata, the statutory rate table and
//! the income tax table, plus the environment settings of the server binary.
//!
//! # Example
//!
//! ```no_run
//! use payroll_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/kr").unwrap();
//! println!("Loaded rules: {}", config.metadata().name);
//! ```

mod loader;
mod server;
mod types;

pub use loader::ConfigLoader;
pub use server::{BIND_ADDR_VAR, CONFIG_DIR_VAR, ServerSettings};
pub use types::{IncomeTaxConfig, PayrollConfig, PayrollMetadata};
