//! Assertion helpers.
//!
//! Each check returns `Result<(), ApiTestError>` with an
//! [`ApiTestError::Assertion`] payload, so test bodies propagate them
//! with `?` and the case layer counts the failure.

use crate::caller::ApiResponse;
use crate::error::{ApiTestError, Result};
use serde_json::Value;
use std::fmt::Debug;

/// General-purpose value checks.
pub struct Assert;

impl Assert {
    fn fail(message: String) -> ApiTestError {
        ApiTestError::Assertion(message)
    }

    /// Fails unless `actual == expected`.
    pub fn equal<T: PartialEq + Debug>(actual: T, expected: T) -> Result<()> {
        if actual != expected {
            return Err(Self::fail(format!(
                "expected {:?}, but got {:?}",
                expected, actual
            )));
        }
        Ok(())
    }

    /// Fails when `actual == expected`.
    pub fn not_equal<T: PartialEq + Debug>(actual: T, expected: T) -> Result<()> {
        if actual == expected {
            return Err(Self::fail(format!(
                "expected {:?} to be different from {:?}",
                actual, expected
            )));
        }
        Ok(())
    }

    /// Fails unless the condition holds.
    pub fn is_true(condition: bool) -> Result<()> {
        if !condition {
            return Err(Self::fail("expected true, but got false".to_string()));
        }
        Ok(())
    }

    /// Fails when the condition holds.
    pub fn is_false(condition: bool) -> Result<()> {
        if condition {
            return Err(Self::fail("expected false, but got true".to_string()));
        }
        Ok(())
    }

    /// Fails unless the option is `None`.
    pub fn is_none<T: Debug>(value: &Option<T>) -> Result<()> {
        if let Some(inner) = value {
            return Err(Self::fail(format!("expected none, but got {:?}", inner)));
        }
        Ok(())
    }

    /// Fails unless the option holds a value.
    pub fn is_some<T>(value: &Option<T>) -> Result<()> {
        if value.is_none() {
            return Err(Self::fail("expected a value, but got none".to_string()));
        }
        Ok(())
    }

    /// Fails unless `item` appears in `collection`.
    pub fn contains<T: PartialEq + Debug>(collection: &[T], item: &T) -> Result<()> {
        if !collection.contains(item) {
            return Err(Self::fail(format!(
                "expected {:?} to be in {:?}",
                item, collection
            )));
        }
        Ok(())
    }

    /// Fails when `item` appears in `collection`.
    pub fn not_contains<T: PartialEq + Debug>(collection: &[T], item: &T) -> Result<()> {
        if collection.contains(item) {
            return Err(Self::fail(format!(
                "expected {:?} not to be in {:?}",
                item, collection
            )));
        }
        Ok(())
    }

    /// Fails unless the JSON value is non-null.
    pub fn json_present(value: &Value) -> Result<()> {
        if value.is_null() {
            return Err(Self::fail("expected a JSON value, but got null".to_string()));
        }
        Ok(())
    }
}

/// Response-shaped checks.
pub struct HttpAssert;

impl HttpAssert {
    /// Fails unless the status code matches.
    pub fn status_code(response: &ApiResponse, expected: u16) -> Result<()> {
        if response.status != expected {
            return Err(ApiTestError::Assertion(format!(
                "expected status code {}, but got {}",
                expected, response.status
            )));
        }
        Ok(())
    }

    /// Fails unless the parsed body equals the expected JSON.
    pub fn json_body(response: &ApiResponse, expected: &Value) -> Result<()> {
        match &response.json {
            None => Err(ApiTestError::Assertion(
                "response body is not valid JSON".to_string(),
            )),
            Some(actual) if actual != expected => Err(ApiTestError::Assertion(format!(
                "expected JSON body {}, but got {}",
                expected, actual
            ))),
            Some(_) => Ok(()),
        }
    }

    /// Fails unless the raw body contains the fragment.
    pub fn body_contains(response: &ApiResponse, fragment: &str) -> Result<()> {
        if !response.body.contains(fragment) {
            return Err(ApiTestError::Assertion(format!(
                "expected response body to contain '{}'",
                fragment
            )));
        }
        Ok(())
    }
}
