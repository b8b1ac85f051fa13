//! Test case: the lifecycle engine for one suite.
//!
//! A run walks a fixed progression:
//! `Init → SetupClass? → {Setup → Test → Teardown}* → TeardownClass? → Done`.
//! Phases never interleave across test methods, and one test's failure
//! never aborts the rest of the suite.

use crate::args::Invocation;
use crate::context::RunContext;
use crate::descriptor::{Role, TestMethod};
use crate::error::ApiTestError;

/// One failed test and its message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    /// Test method name.
    pub test: String,
    /// Failure message.
    pub message: String,
}

/// Counters for one suite run.
#[derive(Debug, Clone)]
pub struct CaseResult {
    /// Suite name.
    pub name: String,
    /// Test methods executed.
    pub total: usize,
    /// Tests that passed.
    pub passed: usize,
    /// Tests that failed.
    pub failed: usize,
    /// Failed tests with messages, in execution order.
    pub failures: Vec<Failure>,
}

impl CaseResult {
    fn new(name: &str, total: usize) -> Self {
        Self {
            name: name.to_string(),
            total,
            passed: 0,
            failed: 0,
            failures: Vec::new(),
        }
    }

    fn record_failure(&mut self, test: &str, error: &ApiTestError) {
        self.failed += 1;
        self.failures.push(Failure {
            test: test.to_string(),
            message: error.to_string(),
        });
        tracing::warn!(test, error = %error, "test failed");
    }
}

/// A named suite: lifecycle slots plus test methods in registration
/// order.
///
/// Lifecycle slots are singular by overwrite-last-wins; methods with
/// [`Role::Ignore`] are dropped at classification and never counted.
#[derive(Debug)]
pub struct TestCase {
    name: String,
    setup: Option<TestMethod>,
    teardown: Option<TestMethod>,
    setup_class: Option<TestMethod>,
    teardown_class: Option<TestMethod>,
    tests: Vec<TestMethod>,
}

impl TestCase {
    /// Creates an empty suite.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            setup: None,
            teardown: None,
            setup_class: None,
            teardown_class: None,
            tests: Vec::new(),
        }
    }

    /// Classifies a method into the suite by its role.
    pub fn with_method(mut self, method: TestMethod) -> Self {
        match method.role() {
            Role::Test => self.tests.push(method),
            Role::Setup => self.setup = Some(method),
            Role::Teardown => self.teardown = Some(method),
            Role::SetupClass => self.setup_class = Some(method),
            Role::TeardownClass => self.teardown_class = Some(method),
            Role::Ignore => {
                tracing::debug!(case = %self.name, method = method.name(), "ignored method dropped");
            }
        }
        self
    }

    /// Suite name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of runnable test methods.
    pub fn test_count(&self) -> usize {
        self.tests.len()
    }

    /// Names of the runnable test methods, in execution order.
    pub fn test_names(&self) -> impl Iterator<Item = &str> {
        self.tests.iter().map(|m| m.name())
    }

    /// Runs the suite against the given context.
    ///
    /// A setup-class failure marks every test failed (the totals are
    /// preserved) and skips straight to teardown-class, which runs
    /// regardless of any earlier outcome.
    pub fn run(&self, ctx: &RunContext) -> CaseResult {
        let mut result = CaseResult::new(&self.name, self.tests.len());
        tracing::info!(case = %self.name, tests = self.tests.len(), "running test case");

        if let Some(method) = &self.setup_class {
            tracing::debug!(case = %self.name, phase = "setup_class");
            if let Err(error) = self.invoke(method, ctx) {
                for method in &self.tests {
                    result.record_failure(method.name(), &error);
                }
                self.run_teardown_class(ctx);
                return result;
            }
        }

        for method in &self.tests {
            let mut test_error = None;

            if let Some(setup) = &self.setup {
                tracing::debug!(case = %self.name, test = method.name(), phase = "setup");
                if let Err(error) = self.invoke(setup, ctx) {
                    test_error = Some(error);
                }
            }

            if test_error.is_none() {
                tracing::info!(case = %self.name, test = method.name(), phase = "test");
                if let Err(error) = self.invoke(method, ctx) {
                    test_error = Some(error);
                }
            }

            // Teardown always runs, even when setup or the test failed.
            if let Some(teardown) = &self.teardown {
                tracing::debug!(case = %self.name, test = method.name(), phase = "teardown");
                if let Err(error) = self.invoke(teardown, ctx) {
                    tracing::warn!(
                        case = %self.name,
                        test = method.name(),
                        error = %error,
                        "teardown failed"
                    );
                }
            }

            match test_error {
                None => result.passed += 1,
                Some(error) => result.record_failure(method.name(), &error),
            }
        }

        self.run_teardown_class(ctx);
        tracing::info!(
            case = %self.name,
            passed = result.passed,
            failed = result.failed,
            "test case done"
        );
        result
    }

    fn run_teardown_class(&self, ctx: &RunContext) {
        if let Some(method) = &self.teardown_class {
            tracing::debug!(case = %self.name, phase = "teardown_class");
            if let Err(error) = self.invoke(method, ctx) {
                tracing::warn!(case = %self.name, error = %error, "teardown_class failed");
            }
        }
    }

    fn invoke(&self, method: &TestMethod, ctx: &RunContext) -> crate::Result<serde_json::Value> {
        // The run-wide default budget applies to test methods only;
        // lifecycle hooks run unbudgeted unless they carry their own.
        let default_timeout = match method.role() {
            Role::Test => ctx.default_timeout(),
            _ => None,
        };
        let f = method.compose(ctx.caller(), default_timeout);
        f(Invocation::new(method.name(), ctx.vars()))
    }
}
