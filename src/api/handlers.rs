//! HTTP request handlers for the payroll engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{BatchSummary, calculate_payroll};
use crate::error::EngineResult;
use crate::models::{PayrollInput, PayrollMonth, PayrollResult};

use super::request::{BatchRequest, PayrollRequest};
use super::response::{ApiError, ApiErrorResponse, BatchItemOutcome, BatchResponse, RatesResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/calculate", post(calculate_handler))
        .route("/calculate/batch", post(batch_handler))
        .route("/rates", get(rates_handler))
        .route("/rates/:month", get(rate_for_month_handler))
        .with_state(state)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn error_response(error: ApiErrorResponse) -> Response {
    json_response(error.status, error.error)
}

/// Maps a JSON extraction failure to a 400 response.
fn rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // The body text carries serde's detailed message
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    json_response(StatusCode::BAD_REQUEST, error)
}

fn process_request(request: PayrollRequest, state: &AppState) -> EngineResult<PayrollResult> {
    let input = PayrollInput::try_from(request)?;
    calculate_payroll(&input, state.config().config())
}

/// Handler for POST /calculate endpoint.
///
/// Accepts a payroll request and returns the calculated payroll result.
async fn calculate_handler(
    State(state): State<AppState>,
    payload: Result<Json<PayrollRequest>, JsonRejection>,
) -> Response {
    // Generate correlation ID for request tracking
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing payroll request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let employee_id = request.employee_id.clone();
    let start_time = Instant::now();
    match process_request(request, &state) {
        Ok(result) => {
            info!(
                correlation_id = %correlation_id,
                employee_id = %employee_id,
                net_pay = %result.net_pay,
                negative_net_pay = result.negative_net_pay,
                duration_us = start_time.elapsed().as_micros(),
                "Payroll calculation completed"
            );
            json_response(StatusCode::OK, result)
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                employee_id = %employee_id,
                error = %err,
                "Payroll calculation failed"
            );
            error_response(err.into())
        }
    }
}

/// Handler for POST /calculate/batch endpoint.
///
/// Each item is computed independently. A failing item is reported in its
/// own outcome and never fails the request.
async fn batch_handler(
    State(state): State<AppState>,
    payload: Result<Json<BatchRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };
    info!(
        correlation_id = %correlation_id,
        items = request.items.len(),
        "Processing payroll batch"
    );

    let start_time = Instant::now();
    let mut employee_ids = Vec::with_capacity(request.items.len());
    let outcomes: Vec<EngineResult<PayrollResult>> = request
        .items
        .into_iter()
        .map(|item| {
            employee_ids.push(item.employee_id.clone());
            process_request(item, &state)
        })
        .collect();
    let summary = match BatchSummary::from_outcomes(&outcomes) {
        Ok(summary) => summary,
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Batch totals overflowed"
            );
            return error_response(err.into());
        }
    };

    let items = outcomes
        .into_iter()
        .zip(employee_ids)
        .enumerate()
        .map(|(index, (outcome, employee_id))| match outcome {
            Ok(result) => BatchItemOutcome {
                index,
                employee_id,
                result: Some(result),
                error: None,
            },
            Err(err) => {
                warn!(
                    correlation_id = %correlation_id,
                    index,
                    employee_id = %employee_id,
                    error = %err,
                    "Batch item failed"
                );
                let api_error: ApiErrorResponse = err.into();
                BatchItemOutcome {
                    index,
                    employee_id,
                    result: None,
                    error: Some(api_error.error),
                }
            }
        })
        .collect();

    info!(
        correlation_id = %correlation_id,
        succeeded = summary.succeeded,
        failed = summary.failed,
        negative_net_pay = summary.negative_net_pay,
        duration_us = start_time.elapsed().as_micros(),
        "Payroll batch completed"
    );
    json_response(StatusCode::OK, BatchResponse { items, summary })
}

/// Handler for GET /rates endpoint.
async fn rates_handler(State(state): State<AppState>) -> Response {
    let loader = state.config();
    json_response(
        StatusCode::OK,
        RatesResponse {
            metadata: loader.metadata().clone(),
            rates: loader.rate_table().to_vec(),
        },
    )
}

/// Handler for GET /rates/:month endpoint.
///
/// Returns the rate record in force for the month.
async fn rate_for_month_handler(
    State(state): State<AppState>,
    Path(month): Path<String>,
) -> Response {
    let resolved = month
        .parse::<PayrollMonth>()
        .and_then(|month| state.config().resolve_rates(month));

    match resolved {
        Ok(record) => json_response(StatusCode::OK, record),
        Err(err) => {
            warn!(month = %month, error = %err, "Rate lookup failed");
            error_response(err.into())
        }
    }
}
