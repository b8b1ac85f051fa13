use crate::harness::{Assertion, Scenario};
use apitest_core::{ApiRequest, ApiTestError, Assert, MockCaller, TestCase, TestMethod};
use serde_json::{json, Value};

#[test]
fn test_empty_run_reports_zero_rate() {
    Scenario::new("empty_run")
        .run_suites()
        .assert_completed()
        .assert_total(0)
        .assert_pass_rate("0.00")
        .run()
        .unwrap();
}

#[test]
fn test_failing_provider_aborts_before_any_test() {
    Scenario::new("discovery_failure")
        .suite(TestCase::new("fine").with_method(TestMethod::test("test_ok", |_| {
            Ok(Value::Null)
        })))
        .failing_provider("suite file is malformed")
        .run_suites()
        .assert_discovery_error()
        .run()
        .unwrap();
}

#[test]
fn test_report_mirrors_the_aggregate() {
    Scenario::new("report_fields")
        .suite(
            TestCase::new("alpha")
                .with_method(TestMethod::test("test_ok", |_| Ok(Value::Null)))
                .with_method(TestMethod::test("test_bad", |_| {
                    Err(ApiTestError::Assertion("nope".into()))
                })),
        )
        .suite(TestCase::new("beta").with_method(TestMethod::test("test_ok_too", |_| {
            Ok(Value::Null)
        })))
        .run_suites()
        .assert(Assertion::CaseCount(2))
        .assert(Assertion::CaseFailedIs {
            case: "alpha".to_string(),
            failed: 1,
        })
        .assert(Assertion::Custom(Box::new(|outcome| {
            let report = outcome.report();
            anyhow::ensure!(report.total == 3, "report total {} != 3", report.total);
            anyhow::ensure!(report.passed == 2, "report passed {} != 2", report.passed);
            anyhow::ensure!(report.failed == 1, "report failed {} != 1", report.failed);
            anyhow::ensure!(
                (report.pass_rate - 66.67).abs() < 0.001,
                "report pass_rate {} != 66.67",
                report.pass_rate
            );
            let rendered = serde_json::to_value(&report)?;
            anyhow::ensure!(rendered["run_id"].is_string(), "run_id missing");
            anyhow::ensure!(
                rendered["cases"][0]["failures"][0]["test"] == json!("test_bad"),
                "failure detail missing from report"
            );
            Ok(())
        })))
        .run()
        .unwrap();
}

#[test]
fn test_mock_backed_suite_runs_offline() {
    Scenario::new("mock_suite")
        .suite(
            TestCase::new("login")
                .with_method(
                    TestMethod::test("test_login", |inv| {
                        Assert::equal(inv.require("status_code")?, &json!(200))?;
                        let body = inv.require("response_json")?;
                        Assert::json_present(&body["token"])?;
                        Ok(json!({"token": body["token"]}))
                    })
                    .with_api(ApiRequest::post("https://api.example.com/login"))
                    .with_mock(MockCaller::new(200, "login successful").with_json(json!({
                        "success": true,
                        "token": "1234567890",
                    })))
                    .capture(),
                )
                .with_method(
                    TestMethod::test("test_logout", |inv| {
                        Assert::equal(inv.require("status_code")?, &json!(200))?;
                        Ok(Value::Null)
                    })
                    .with_api(
                        ApiRequest::post("https://api.example.com/logout")
                            .header("Authorization", "Bearer $token"),
                    )
                    .with_mock(MockCaller::new(200, "logout successful")),
                ),
        )
        .run_suites()
        .assert_total(2)
        .assert_passed(2)
        .assert_var("token", json!("1234567890"))
        .run()
        .expect("the mock-backed suite must pass without network access");
}
