use crate::harness::Scenario;
use apitest_core::{ApiTestError, DataSet, Invocation, TestCase, TestMethod};
use serde_json::{json, Value};
use std::thread;
use std::time::Duration;

fn bump(inv: &Invocation, key: &str) -> i64 {
    let next = inv.vars.get(key).and_then(|v| v.as_i64()).unwrap_or(0) + 1;
    inv.vars.set(key, json!(next));
    next
}

#[test]
fn test_timeout_failure_names_test_and_limit() {
    Scenario::new("timeout_reported")
        .suite(
            TestCase::new("slow_suite")
                .with_method(
                    TestMethod::test("test_slow", |_| {
                        thread::sleep(Duration::from_secs(2));
                        Ok(Value::Null)
                    })
                    .with_timeout(Duration::from_secs(1)),
                )
                .with_method(TestMethod::test("test_after", |_| Ok(Value::Null))),
        )
        .run_suites()
        .assert_completed()
        .assert_total(2)
        .assert_passed(1)
        .assert_failed(1)
        .assert_failure_contains("test_slow", "test_slow")
        .assert_failure_contains("test_slow", "time limit of 1 seconds")
        .run()
        .expect("the run must reach done despite the timeout");
}

#[test]
fn test_repeat_runs_exactly_n_times() {
    Scenario::new("repeat_count")
        .suite(
            TestCase::new("repeated").with_method(
                TestMethod::test("test_ping", |inv| {
                    bump(&inv, "runs");
                    Ok(Value::Null)
                })
                .with_repeat(5),
            ),
        )
        .run_suites()
        .assert_passed(1)
        .assert_var("runs", json!(5))
        .run()
        .unwrap();
}

#[test]
fn test_repeat_stops_at_first_failure() {
    Scenario::new("repeat_aborts")
        .suite(
            TestCase::new("flaky").with_method(
                TestMethod::test("test_flaky", |inv| {
                    let attempt = bump(&inv, "attempts");
                    if attempt >= 3 {
                        Err(ApiTestError::Assertion("third attempt fails".into()))
                    } else {
                        Ok(Value::Null)
                    }
                })
                .with_repeat(5),
            ),
        )
        .run_suites()
        .assert_failed(1)
        .assert_var("attempts", json!(3))
        .run()
        .unwrap();
}

#[test]
fn test_data_sets_bind_in_order() {
    Scenario::new("data_driven")
        .suite(
            TestCase::new("roles").with_method(
                TestMethod::test("test_role", |inv| {
                    let user = inv.require("user")?.clone();
                    let mut seen = inv
                        .vars
                        .get("seen")
                        .and_then(|v| v.as_array().cloned())
                        .unwrap_or_default();
                    seen.push(user);
                    inv.vars.set("seen", Value::Array(seen));
                    Ok(Value::Null)
                })
                .with_data([
                    DataSet::from_value(json!({"user": "ada"})),
                    DataSet::from_value(json!({"user": "grace"})),
                    DataSet::from_value(json!({"user": "mary"})),
                ]),
            ),
        )
        .run_suites()
        .assert_passed(1)
        .assert_var("seen", json!(["ada", "grace", "mary"]))
        .run()
        .unwrap();
}

#[test]
fn test_default_timeout_applies_to_unbudgeted_tests() {
    Scenario::new("default_budget")
        .default_timeout(Duration::from_millis(50))
        .suite(
            TestCase::new("budgeted").with_method(TestMethod::test("test_slowish", |_| {
                thread::sleep(Duration::from_millis(300));
                Ok(Value::Null)
            })),
        )
        .run_suites()
        .assert_failed(1)
        .assert_failure_contains("test_slowish", "exceeded the time limit")
        .run()
        .unwrap();
}
