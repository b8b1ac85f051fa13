//! Users suite: lifecycle methods, data-driven and repeated tests,
//! cache propagation, and a per-test budget.

use apitest_core::{
    ApiRequest, Assert, DataSet, Lookup, MockCaller, Result, TestCase, TestMethod,
};
use serde_json::{json, Value};
use std::time::Duration;

pub fn suite() -> Result<TestCase> {
    Ok(TestCase::new("users")
        .with_method(TestMethod::setup_class("init_env", |_| {
            tracing::info!("preparing users environment");
            Ok(Value::Null)
        }))
        .with_method(TestMethod::setup("before_each", |_| {
            tracing::debug!("per-test setup");
            Ok(Value::Null)
        }))
        .with_method(
            TestMethod::test("test_fetch_users", |inv| {
                Assert::equal(inv.require("status_code")?, &json!(200))?;
                let body = inv.require("response_json")?;
                Assert::is_true(body["users"].is_array())?;
                Ok(json!({ "users": body["users"] }))
            })
            .with_api(ApiRequest::get("https://api.example.com/users"))
            .with_mock(MockCaller::new(200, "ok").with_json(json!({
                "users": [
                    {"name": "ada", "address": {"city": "London"}},
                    {"name": "grace", "address": {"city": "Arlington"}},
                ],
            })))
            .capture(),
        )
        .with_method(
            TestMethod::test("test_first_user_city", |inv| {
                let users = inv.require("users")?;
                let city = Lookup::new(users).at(0).key("address").key("city");
                Assert::equal(city.as_str(), Some("London"))?;
                Ok(Value::Null)
            })
            .with_params(["users"])
            .inject(),
        )
        .with_method(
            TestMethod::test("test_known_roles", |inv| {
                let role = inv.require("role")?.as_str().unwrap_or_default().to_string();
                let allowed = ["admin", "editor", "viewer"];
                Assert::contains(&allowed, &role.as_str())?;
                Ok(Value::Null)
            })
            .with_data([
                DataSet::from_value(json!({"user": "ada", "role": "admin"})),
                DataSet::from_value(json!({"user": "grace", "role": "editor"})),
                DataSet::from_value(json!({"user": "mary", "role": "viewer"})),
            ]),
        )
        .with_method(
            TestMethod::test("test_health_endpoint", |inv| {
                Assert::equal(inv.require("status_code")?, &json!(200))?;
                Ok(Value::Null)
            })
            .with_api(ApiRequest::get("https://api.example.com/health"))
            .with_mock(MockCaller::new(200, "healthy"))
            .with_repeat(3),
        )
        .with_method(
            TestMethod::test("test_fast_lookup", |_| Ok(json!("done")))
                .with_timeout(Duration::from_secs(2)),
        )
        .with_method(TestMethod::ignored("legacy_probe", |_| {
            tracing::info!("retired check, kept for reference");
            Ok(Value::Null)
        }))
        .with_method(TestMethod::teardown("after_each", |_| {
            tracing::debug!("per-test teardown");
            Ok(Value::Null)
        }))
        .with_method(TestMethod::teardown_class("drop_env", |_| {
            tracing::info!("tearing down users environment");
            Ok(Value::Null)
        })))
}
