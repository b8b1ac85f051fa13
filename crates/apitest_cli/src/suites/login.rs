//! Login/logout suite: captures a session token and substitutes it into
//! the follow-up request.

use apitest_core::{ApiRequest, Assert, MockCaller, Result, TestCase, TestMethod};
use serde_json::json;

pub fn suite() -> Result<TestCase> {
    Ok(TestCase::new("login")
        .with_method(
            TestMethod::test("test_login", |inv| {
                Assert::equal(inv.require("status_code")?, &json!(200))?;
                let body = inv.require("response_json")?;
                Assert::is_true(body["success"].as_bool().unwrap_or(false))?;
                Assert::json_present(&body["token"])?;
                Ok(json!({ "token": body["token"] }))
            })
            .with_api(ApiRequest::post("https://api.example.com/login").json(json!({
                "user": "demo",
                "password": "demo",
            })))
            .with_mock(MockCaller::new(200, "login successful").with_json(json!({
                "success": true,
                "token": "1234567890",
            })))
            .capture(),
        )
        .with_method(
            TestMethod::test("test_logout", |inv| {
                Assert::equal(inv.require("status_code")?, &json!(200))?;
                let body = inv.require("response_json")?;
                Assert::is_true(body["success"].as_bool().unwrap_or(false))?;
                Ok(serde_json::Value::Null)
            })
            // $token resolves from the variable cache written by test_login.
            .with_api(
                ApiRequest::post("https://api.example.com/logout")
                    .header("Authorization", "Bearer $token"),
            )
            .with_mock(MockCaller::new(200, "logout successful").with_json(json!({
                "success": true,
                "message": "logged out",
            }))),
        ))
}
