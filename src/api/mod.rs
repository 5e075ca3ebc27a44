//! HTTP API module for the payroll engine.
//!
//! This module provides the REST API endpoints for calculating payroll
//! deductions and inspecting the configured rate table.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{BatchRequest, PayrollRequest};
pub use response::{ApiError, ApiErrorResponse, BatchItemOutcome, BatchResponse};
pub use state::AppState;
