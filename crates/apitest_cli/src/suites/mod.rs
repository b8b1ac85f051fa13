//! Bundled demo suites.
//!
//! These run entirely against mock responses; no network traffic.

use apitest_core::{Result, TestCase};

mod login;
mod users;

/// Named suite providers in execution order.
pub fn all() -> Vec<(&'static str, fn() -> Result<TestCase>)> {
    vec![("login", login::suite), ("users", users::suite)]
}
