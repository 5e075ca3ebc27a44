//! Integration tests for the payroll engine HTTP API.
//!
//! This test suite covers:
//! - Statutory four-insurance payroll, including pension base clamping
//! - Rate resolution across effective months
//! - Income tax by dependents
//! - Freelancer 3.3% withholding
//! - Negative net pay reporting
//! - Batch calculation
//! - Error cases

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use std::str::FromStr;
use tower::ServiceExt;

use payroll_engine::api::{AppState, create_router};
use payroll_engine::config::ConfigLoader;

// =============================================================================
// Test Helpers
// =============================================================================

fn create_router_for_test() -> Router {
    let config = ConfigLoader::load("./config/kr").expect("Failed to load config");
    create_router(AppState::new(config))
}

fn decimal(value: &Value) -> Decimal {
    match value {
        Value::String(s) => Decimal::from_str(s).unwrap(),
        Value::Number(n) => Decimal::from_str(&n.to_string()).unwrap(),
        other => panic!("Expected a decimal, got {}", other),
    }
}

async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap();
    (status, json)
}

async fn post(router: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(router, request).await
}

async fn get(router: Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(router, request).await
}

fn statutory(employee_id: &str, base_pay: &str, month: &str, dependents: u32) -> Value {
    json!({
        "employee_id": employee_id,
        "base_pay": base_pay,
        "payroll_month": month,
        "tax_type": "statutory_four_insurance",
        "dependents_count": dependents
    })
}

fn freelancer(employee_id: &str, base_pay: &str, month: &str) -> Value {
    json!({
        "employee_id": employee_id,
        "base_pay": base_pay,
        "payroll_month": month,
        "tax_type": "flat_withholding"
    })
}

fn assert_amount(result: &Value, field: &str, expected: i64) {
    assert_eq!(
        decimal(&result[field]),
        Decimal::from(expected),
        "unexpected {}",
        field
    );
}

fn assert_employer_burden_total(result: &Value, expected: i64) {
    let total: Decimal = result["employer_burden"]
        .as_object()
        .unwrap()
        .values()
        .map(decimal)
        .sum();
    assert_eq!(total, Decimal::from(expected), "unexpected employer burden");
}

fn assert_deduction(result: &Value, kind: &str, expected: i64) {
    assert_eq!(
        decimal(&result["deductions"][kind]),
        Decimal::from(expected),
        "unexpected {} deduction",
        kind
    );
}

// =============================================================================
// SECTION 1: Statutory four insurances
// =============================================================================

#[tokio::test]
async fn test_statutory_2_5m_before_mid_year_update() {
    let (status, result) = post(
        create_router_for_test(),
        "/calculate",
        statutory("emp_001", "2500000", "2025-06", 1),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["applied_rate_month"], "2025-01");
    assert_deduction(&result, "national_pension", 112_500);
    assert_deduction(&result, "health_insurance", 88_625);
    // 88625 x 0.1295 = 11476.9375
    assert_deduction(&result, "long_term_care", 11_476);
    assert_deduction(&result, "employment_insurance", 22_500);
    assert_deduction(&result, "income_tax", 41_630);
    assert_deduction(&result, "local_income_tax", 4_163);
    assert_amount(&result, "total_deductions", 280_894);
    assert_amount(&result, "net_pay", 2_219_106);
    assert_employer_burden_total(&result, 235_101);
    assert_amount(&result, "total_labor_cost", 2_735_101);
    assert_eq!(result["negative_net_pay"], false);
}

#[tokio::test]
async fn test_statutory_2_5m_after_rate_change() {
    let (status, result) = post(
        create_router_for_test(),
        "/calculate",
        statutory("emp_001", "2500000", "2026-03", 1),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["applied_rate_month"], "2026-01");
    assert_deduction(&result, "national_pension", 118_750);
    assert_deduction(&result, "health_insurance", 89_875);
    // 89875 x 0.1314 = 11809.575
    assert_deduction(&result, "long_term_care", 11_809);
    assert_deduction(&result, "employment_insurance", 22_500);
    assert_employer_burden_total(&result, 242_934);
    assert_amount(&result, "net_pay", 2_211_273);
    assert_amount(&result, "total_labor_cost", 2_742_934);
}

#[tokio::test]
async fn test_pension_base_clamped_to_maximum() {
    let (status, result) = post(
        create_router_for_test(),
        "/calculate",
        statutory("emp_high", "8000000", "2025-09", 1),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["applied_rate_month"], "2025-07");
    // 6,370,000 x 0.045
    assert_deduction(&result, "national_pension", 286_650);
    // Health insurance is never clamped
    assert_deduction(&result, "health_insurance", 283_600);
    assert_deduction(&result, "long_term_care", 36_726);
    assert_deduction(&result, "employment_insurance", 72_000);
}

#[tokio::test]
async fn test_pension_base_clamped_to_minimum() {
    let (status, result) = post(
        create_router_for_test(),
        "/calculate",
        statutory("emp_low", "300000", "2025-06", 1),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    // 390,000 x 0.045
    assert_deduction(&result, "national_pension", 17_550);
    assert_deduction(&result, "health_insurance", 10_635);
    assert_deduction(&result, "long_term_care", 1_377);
    assert_deduction(&result, "employment_insurance", 2_700);
    // Below the first income tax bracket
    assert_deduction(&result, "income_tax", 0);
    assert_deduction(&result, "local_income_tax", 0);
    assert_amount(&result, "net_pay", 267_738);
}

#[tokio::test]
async fn test_effective_month_boundary_switches_record() {
    let router = create_router_for_test();
    let (_, june) = post(
        router.clone(),
        "/calculate",
        statutory("emp_low", "300000", "2025-06", 1),
    )
    .await;
    let (_, july) = post(
        router,
        "/calculate",
        statutory("emp_low", "300000", "2025-07", 1),
    )
    .await;

    assert_eq!(june["applied_rate_month"], "2025-01");
    assert_eq!(july["applied_rate_month"], "2025-07");
    assert_deduction(&june, "national_pension", 17_550);
    // The July record raised the pension floor to 400,000
    assert_deduction(&july, "national_pension", 18_000);
}

#[tokio::test]
async fn test_more_dependents_lower_income_tax() {
    let (status, result) = post(
        create_router_for_test(),
        "/calculate",
        statutory("emp_family", "2500000", "2025-06", 3),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_deduction(&result, "income_tax", 13_710);
    assert_deduction(&result, "local_income_tax", 1_371);
    // Insurances do not depend on dependents
    assert_employer_burden_total(&result, 235_101);
}

// =============================================================================
// SECTION 2: Freelancer withholding
// =============================================================================

#[tokio::test]
async fn test_freelancer_withholding() {
    let (status, result) = post(
        create_router_for_test(),
        "/calculate",
        freelancer("emp_free", "1234567", "2025-06"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_deduction(&result, "income_tax", 37_037);
    assert_deduction(&result, "local_income_tax", 3_703);
    assert!(result["deductions"]["national_pension"].is_null());
    assert_amount(&result, "net_pay", 1_193_827);
    assert_employer_burden_total(&result, 0);
    assert_amount(&result, "total_labor_cost", 1_234_567);
    assert!(result.get("applied_rate_month").is_none());
}

#[tokio::test]
async fn test_freelancer_does_not_need_rate_table() {
    let (status, result) = post(
        create_router_for_test(),
        "/calculate",
        freelancer("emp_free", "1000000", "2020-01"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_amount(&result, "net_pay", 967_000);
}

// =============================================================================
// SECTION 3: Negative net pay
// =============================================================================

#[tokio::test]
async fn test_zero_pay_reports_negative_net_pay() {
    let (status, result) = post(
        create_router_for_test(),
        "/calculate",
        statutory("emp_unpaid", "0", "2025-06", 1),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    // Pension is still charged on the minimum base
    assert_deduction(&result, "national_pension", 17_550);
    assert_amount(&result, "net_pay", -17_550);
    assert_amount(&result, "total_labor_cost", 17_550);
    assert_eq!(result["negative_net_pay"], true);

    let warnings = result["audit_trace"]["warnings"].as_array().unwrap();
    assert!(
        warnings
            .iter()
            .any(|w| w["code"] == "NEGATIVE_NET_PAY" && w["severity"] == "high")
    );
}

// =============================================================================
// SECTION 4: Audit trail
// =============================================================================

#[tokio::test]
async fn test_statutory_audit_steps_in_order() {
    let (status, result) = post(
        create_router_for_test(),
        "/calculate",
        statutory("emp_audit", "2500000", "2025-06", 1),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let steps = result["audit_trace"]["steps"].as_array().unwrap();
    let rule_ids: Vec<&str> = steps
        .iter()
        .map(|s| s["rule_id"].as_str().unwrap())
        .collect();
    assert_eq!(
        rule_ids,
        vec![
            "rate_resolution",
            "national_pension",
            "health_insurance",
            "long_term_care",
            "employment_insurance",
            "income_tax",
            "payroll_aggregation",
        ]
    );
    for (i, step) in steps.iter().enumerate() {
        assert_eq!(step["step_number"].as_u64().unwrap(), i as u64 + 1);
    }
}

#[tokio::test]
async fn test_result_contains_all_required_fields() {
    let (status, result) = post(
        create_router_for_test(),
        "/calculate",
        statutory("emp_fields", "2500000", "2025-06", 1),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(result["calculation_id"].is_string());
    assert!(result["timestamp"].is_string());
    assert!(result["engine_version"].is_string());
    assert_eq!(result["payroll_month"], "2025-06");
    assert_eq!(result["tax_type"], "statutory_four_insurance");
    assert!(result["deductions"].is_object());
    assert!(result["audit_trace"]["steps"].is_array());
    assert!(result["audit_trace"]["warnings"].is_array());
}

// =============================================================================
// SECTION 5: Batch
// =============================================================================

#[tokio::test]
async fn test_batch_mixed_outcomes() {
    let body = json!({
        "items": [
            statutory("emp_001", "2500000", "2025-06", 1),
            statutory("emp_early", "2500000", "2024-12", 1),
            freelancer("emp_free", "1000000", "2025-06"),
            statutory("emp_unpaid", "0", "2025-06", 1),
            statutory("emp_bad", "-5", "2025-06", 1)
        ]
    });

    let (status, result) = post(create_router_for_test(), "/calculate/batch", body).await;

    assert_eq!(status, StatusCode::OK);
    let items = result["items"].as_array().unwrap();
    assert_eq!(items.len(), 5);
    assert_eq!(items[1]["error"]["code"], "NO_APPLICABLE_RATE");
    assert_eq!(items[4]["error"]["code"], "INVALID_AMOUNT");
    assert_eq!(items[4]["index"], 4);

    let summary = &result["summary"];
    assert_eq!(summary["total"], 5);
    assert_eq!(summary["succeeded"], 3);
    assert_eq!(summary["failed"], 2);
    assert_eq!(summary["negative_net_pay"], 1);
    // 2,219,106 + 967,000 - 17,550
    assert_eq!(decimal(&summary["total_net_pay"]), Decimal::from(3_168_556));
}

#[tokio::test]
async fn test_empty_batch() {
    let (status, result) =
        post(create_router_for_test(), "/calculate/batch", json!({ "items": [] })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["summary"]["total"], 0);
    assert!(result["items"].as_array().unwrap().is_empty());
}

// =============================================================================
// SECTION 6: Rate table endpoints
// =============================================================================

#[tokio::test]
async fn test_rates_endpoint_lists_records_oldest_first() {
    let (status, result) = get(create_router_for_test(), "/rates").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["metadata"]["code"], "KR-4INS");
    let months: Vec<&str> = result["rates"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["effective_month"].as_str().unwrap())
        .collect();
    assert_eq!(months, vec!["2025-01", "2025-07", "2026-01"]);
}

#[tokio::test]
async fn test_rates_for_exact_effective_month() {
    let (status, result) = get(create_router_for_test(), "/rates/2026-01").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["effective_month"], "2026-01");
    assert_eq!(decimal(&result["national_pension_rate"]), decimal(&json!("0.0475")));
}

#[tokio::test]
async fn test_rates_for_invalid_month() {
    let (status, result) = get(create_router_for_test(), "/rates/2025-1").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(result["code"], "INVALID_MONTH");
}

// =============================================================================
// SECTION 7: Error cases
// =============================================================================

#[tokio::test]
async fn test_month_before_rate_table() {
    let (status, result) = post(
        create_router_for_test(),
        "/calculate",
        statutory("emp_early", "2500000", "2024-12", 1),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(result["code"], "NO_APPLICABLE_RATE");
    assert!(result["message"].as_str().unwrap().contains("2025-01"));
}

#[tokio::test]
async fn test_fractional_base_pay_rejected() {
    let (status, result) = post(
        create_router_for_test(),
        "/calculate",
        statutory("emp_frac", "2500000.5", "2025-06", 1),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(result["code"], "INVALID_AMOUNT");
}

#[tokio::test]
async fn test_zero_dependents_rejected() {
    let (status, result) = post(
        create_router_for_test(),
        "/calculate",
        statutory("emp_zero", "2500000", "2025-06", 0),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(result["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_unknown_tax_type_rejected() {
    let body = json!({
        "employee_id": "emp_x",
        "base_pay": "1000000",
        "payroll_month": "2025-06",
        "tax_type": "daily_worker"
    });

    let (status, result) = post(create_router_for_test(), "/calculate", body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(result["code"], "MALFORMED_JSON");
}

#[tokio::test]
async fn test_missing_content_type_rejected() {
    let request = Request::builder()
        .method("POST")
        .uri("/calculate")
        .body(Body::from(statutory("emp_001", "1", "2025-06", 1).to_string()))
        .unwrap();

    let (status, result) = send(create_router_for_test(), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(result["code"], "MISSING_CONTENT_TYPE");
}

#[tokio::test]
async fn test_base_pay_too_large_to_total_rejected() {
    let (status, result) = post(
        create_router_for_test(),
        "/calculate",
        statutory("emp_huge", "79228162514264337593543950335", "2025-06", 1),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(result["code"], "INVALID_AMOUNT");
}
