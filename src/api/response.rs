//! Response types for the payroll engine API.
//!
//! This module defines the error response structures, the batch and rate
//! table response bodies, and the mapping from engine errors to HTTP status
//! codes.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::calculation::BatchSummary;
use crate::config::PayrollMetadata;
use crate::error::EngineError;
use crate::models::{PayrollResult, RateRecord};

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
#[derive(Debug)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        match error {
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => {
                ApiErrorResponse {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    error: ApiError::with_details(
                        "CONFIG_ERROR",
                        "Configuration error",
                        message,
                    ),
                }
            }
            EngineError::InvalidRateRecord { .. } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "INVALID_RATE_RECORD",
                    "The configured rate table is invalid",
                    message,
                ),
            },
            EngineError::InvalidAmount { field, .. } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "INVALID_AMOUNT",
                    message,
                    format!("Field '{}' must be a non-negative whole amount", field),
                ),
            },
            EngineError::InvalidMonth { .. } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::new("INVALID_MONTH", message),
            },
            EngineError::InvalidInput { .. } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::new("INVALID_INPUT", message),
            },
            EngineError::NoApplicableRate { .. } => ApiErrorResponse {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                error: ApiError::with_details(
                    "NO_APPLICABLE_RATE",
                    message,
                    "No rate record is effective on or before the payroll month",
                ),
            },
        }
    }
}

/// Outcome of one item in a batch calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchItemOutcome {
    /// Position of the item in the request.
    pub index: usize,
    /// Employee the item belongs to.
    pub employee_id: String,
    /// The calculated result, when the item succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<PayrollResult>,
    /// The error, when the item failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

/// Response body for the `/calculate/batch` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResponse {
    /// Per-item outcomes in request order.
    pub items: Vec<BatchItemOutcome>,
    /// Totals across the batch.
    pub summary: BatchSummary,
}

/// Response body for the `/rates` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatesResponse {
    /// Metadata of the loaded rule set.
    pub metadata: PayrollMetadata,
    /// All rate records, oldest first.
    pub rates: Vec<RateRecord>,
}
