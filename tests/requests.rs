//! End-to-end request handling through the JSON envelope

use approx::assert_abs_diff_eq;
use serde_json::{json, Value};
use tvm_engine::{EngineRequest, Evaluator};

fn run(request: Value) -> Value {
    let request: EngineRequest = serde_json::from_value(request).expect("valid request");
    let response = Evaluator::new().evaluate(&request);
    serde_json::to_value(&response).expect("serializable response")
}

#[test]
fn amortize_car_loan() {
    let response = run(json!({
        "operation": "amortize",
        "loan": { "principal": 10000.0, "period_rate": 0.05 / 12.0, "number_of_payments": 60 },
        "periods_per_year": 12
    }));

    assert_eq!(response["operation"], "amortize");
    let payment = response["amortization"]["payment"].as_f64().unwrap();
    assert_abs_diff_eq!(payment, 188.71, epsilon = 0.005);

    let schedule = response["amortization"]["schedule"].as_array().unwrap();
    assert_eq!(schedule.len(), 60);
    assert_eq!(schedule[59]["ending_balance"].as_f64().unwrap(), 0.0);
    assert_eq!(response["yearly"].as_array().unwrap().len(), 5);
}

#[test]
fn amortize_zero_rate() {
    let response = run(json!({
        "operation": "amortize",
        "loan": { "principal": 12000.0, "period_rate": 0.0, "number_of_payments": 12 }
    }));

    assert_eq!(response["amortization"]["payment"].as_f64().unwrap(), 1000.0);
    assert!(response.get("yearly").is_none());
    for row in response["amortization"]["schedule"].as_array().unwrap() {
        assert_eq!(row["interest"].as_f64().unwrap(), 0.0);
    }
}

#[test]
fn degenerate_loan_reported_in_response() {
    let response = run(json!({
        "operation": "amortize",
        "loan": { "principal": 0.0, "period_rate": 0.01, "number_of_payments": 12 }
    }));

    assert_eq!(response["error"]["kind"], "degenerate_loan");
    assert!(response["error"]["message"].as_str().unwrap().contains("principal"));
}

#[test]
fn degenerate_loan_does_not_sink_batch() {
    let requests: Vec<EngineRequest> = serde_json::from_value(json!([
        { "operation": "amortize", "loan": { "principal": 10000.0, "period_rate": 0.005, "number_of_payments": 24 } },
        { "operation": "amortize", "loan": { "principal": -5.0, "period_rate": 0.005, "number_of_payments": 24 } },
        { "operation": "normalize_rate", "rate": { "nominal_rate_percent": 6.0 } }
    ]))
    .unwrap();

    let responses = serde_json::to_value(Evaluator::new().evaluate_batch(&requests)).unwrap();
    assert_eq!(responses[0]["operation"], "amortize");
    assert_eq!(responses[1]["error"]["kind"], "degenerate_loan");
    assert_eq!(responses[2]["operation"], "normalize_rate");
}

#[test]
fn oversized_loan_term_rejected() {
    let response = run(json!({
        "operation": "amortize",
        "loan": { "principal": 1000.0, "period_rate": 0.01, "number_of_payments": 4_000_000_000u32 }
    }));
    assert_eq!(response["error"]["kind"], "invalid_parameter");
}

#[test]
fn tiny_rate_loan_splits_evenly() {
    let response = run(json!({
        "operation": "amortize",
        "loan": { "principal": 12000.0, "period_rate": 1e-17, "number_of_payments": 12 }
    }));
    let payment = response["amortization"]["payment"].as_f64().unwrap();
    assert_abs_diff_eq!(payment, 1000.0, epsilon = 1e-6);
}

#[test]
fn solve_future_value() {
    let response = run(json!({
        "operation": "solve",
        "params": { "solve_for": "fv", "pv": -1000.0, "pmt": 0.0, "nper": 120.0, "rate": 0.07 / 12.0 }
    }));

    assert_eq!(response["result"]["solve_for"], "fv");
    assert_abs_diff_eq!(response["result"]["value"].as_f64().unwrap(), 2009.66, epsilon = 0.01);
}

#[test]
fn solve_payment_for_target() {
    let response = run(json!({
        "operation": "solve",
        "params": { "solve_for": "pmt", "pv": 0.0, "fv": 25000.0, "nper": 60.0, "rate": 0.05 / 12.0 }
    }));

    let pmt = response["result"]["value"].as_f64().unwrap();
    assert!(pmt < 0.0);
    assert_abs_diff_eq!(pmt, -367.70, epsilon = 0.1);
}

#[test]
fn solve_nper_without_solution() {
    let response = run(json!({
        "operation": "solve",
        "params": { "solve_for": "nper", "pv": 1000.0, "fv": 1000.0, "pmt": 0.0, "rate": 0.05 }
    }));

    assert_eq!(response["error"]["kind"], "no_real_solution");
    assert!(response["error"]["message"].as_str().unwrap().contains("not achievable"));
}

#[test]
fn project_with_escalation_and_tax() {
    let response = run(json!({
        "operation": "project",
        "plan": {
            "starting_balance": 5000.0,
            "contributions": { "amount": 200.0, "escalation_rate_percent": 3.0 },
            "rate": { "nominal_rate_percent": 6.0, "frequency": "monthly" },
            "horizon_periods": 24,
            "tax_rate_percent": 20.0
        },
        "trace": true
    }));

    let projection = &response["projection"];
    let periods = projection["periods"].as_array().unwrap();
    assert_eq!(periods.len(), 24);
    assert_abs_diff_eq!(periods[12]["contribution"].as_f64().unwrap(), 206.0, epsilon = 1e-9);
    assert_abs_diff_eq!(
        projection["total_contributions"].as_f64().unwrap(),
        200.0 * 12.0 + 206.0 * 12.0,
        epsilon = 1e-9
    );

    let ending = projection["ending_balance"].as_f64().unwrap();
    let parts = 5000.0
        + projection["total_contributions"].as_f64().unwrap()
        + projection["total_interest"].as_f64().unwrap();
    assert_abs_diff_eq!(ending, parts, epsilon = 1e-6);
}

#[test]
fn project_zero_horizon() {
    let response = run(json!({
        "operation": "project",
        "plan": {
            "starting_balance": 5000.0,
            "contributions": { "amount": 200.0 },
            "rate": { "nominal_rate_percent": 6.0 },
            "horizon_periods": 0
        }
    }));
    assert_eq!(response["error"]["kind"], "invalid_horizon");
}

#[test]
fn convert_rate_through_ear() {
    let response = run(json!({
        "operation": "convert_rate",
        "nominal_rate_percent": 12.0,
        "from": "monthly",
        "to": "annual"
    }));
    let nominal = response["conversion"]["nominal_rate_percent"].as_f64().unwrap();
    assert_abs_diff_eq!(nominal, 12.6825, epsilon = 1e-4);
}

#[test]
fn normalize_rejects_negative_rate() {
    let response = run(json!({
        "operation": "normalize_rate",
        "rate": { "nominal_rate_percent": -2.0, "frequency": "quarterly" }
    }));
    assert_eq!(response["error"]["kind"], "invalid_rate");
}

#[test]
fn required_contribution_goal_met() {
    let response = run(json!({
        "operation": "required_contribution",
        "goal": { "target_value": 1000.0, "current_balance": 2000.0, "horizon_periods": 12, "period_rate": 0.0 }
    }));
    assert_eq!(response["analysis"]["status"], "already_met");
    assert_eq!(response["analysis"]["required_contribution"].as_f64().unwrap(), 0.0);
}

#[test]
fn batch_mixes_success_and_failure() {
    let requests: Vec<EngineRequest> = serde_json::from_value(json!([
        { "operation": "normalize_rate", "rate": { "nominal_rate_percent": 6.0, "frequency": "monthly" } },
        { "operation": "solve", "params": { "solve_for": "rate", "pv": -1.0, "fv": 2.0, "pmt": 0.0, "nper": 1.0 } }
    ]))
    .unwrap();

    let responses = Evaluator::new().evaluate_batch(&requests);
    assert!(responses[0].is_success());
    assert!(!responses[1].is_success());
}
