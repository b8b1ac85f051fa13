//! apitest core library
//!
//! A declarative test-orchestration layer for HTTP-style API tests,
//! providing:
//! - Role/modifier descriptors composed onto plain test functions
//! - A lifecycle engine with per-test failure isolation
//! - Per-test time budgets enforced by worker threads
//! - A thread-partitioned variable cache chaining one test's output
//!   into another test's input
//!
//! # Quick Start
//!
//! ```
//! use apitest_core::{Assert, RunContext, TestCase, TestContext, TestMethod};
//!
//! let case = TestCase::new("smoke")
//!     .with_method(TestMethod::test("test_arithmetic", |_inv| {
//!         Assert::equal(2 + 2, 4)?;
//!         Ok(serde_json::Value::Null)
//!     }));
//!
//! let mut context = TestContext::new();
//! context.register(case);
//!
//! let outcome = context.run(&RunContext::new());
//! assert_eq!(outcome.result.total, 1);
//! assert_eq!(outcome.result.passed, 1);
//! ```
//!
//! # Variable propagation
//!
//! A test that returns a JSON object can capture it into the run's
//! variable cache; a later test declares the parameter and has it
//! injected:
//!
//! ```
//! use apitest_core::{RunContext, TestCase, TestContext, TestMethod};
//! use serde_json::json;
//!
//! let case = TestCase::new("chaining")
//!     .with_method(
//!         TestMethod::test("test_login", |_inv| Ok(json!({"token": "abc123"})))
//!             .capture(),
//!     )
//!     .with_method(
//!         TestMethod::test("test_profile", |inv| {
//!             assert_eq!(inv.require("token")?, &json!("abc123"));
//!             Ok(serde_json::Value::Null)
//!         })
//!         .with_params(["token"])
//!         .inject(),
//!     );
//!
//! let mut context = TestContext::new();
//! context.register(case);
//! let outcome = context.run(&RunContext::new());
//! assert_eq!(outcome.result.failed, 0);
//! ```

mod args;
mod asserts;
mod cache;
mod caller;
mod case;
mod config;
mod context;
mod descriptor;
mod error;
mod lookup;
mod report;
pub mod wrap;

pub use args::{CallArgs, CancelToken, DataSet, Invocation};
pub use asserts::{Assert, HttpAssert};
pub use cache::VarCache;
pub use caller::{ApiRequest, ApiResponse, Caller, HttpCaller, MockCaller};
pub use case::{CaseResult, Failure, TestCase};
pub use config::{Config, HttpConfig, ReportConfig, RunConfig};
pub use context::{RunContext, RunOutcome, TestContext};
pub use descriptor::{Role, TestMethod};
pub use error::{ApiTestError, Result};
pub use lookup::Lookup;
pub use report::{CaseReport, FailureReport, RunReport, TestResult};
pub use wrap::TestFn;
