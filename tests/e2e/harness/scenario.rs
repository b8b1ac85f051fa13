use super::assertions::Assertion;
use super::runner::ScenarioRunner;
use super::steps::ScenarioStep;
use apitest_core::TestCase;
use serde_json::Value;
use std::time::Duration;

/// Fluent DSL for building engine scenarios
pub struct Scenario {
    name: String,
    steps: Vec<ScenarioStep>,
}

impl Scenario {
    /// Create a new scenario with the given name
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            steps: Vec::new(),
        }
    }

    // ===== Registration =====

    /// Register a suite for the next run
    pub fn suite(mut self, case: TestCase) -> Self {
        self.steps.push(ScenarioStep::RegisterSuite { case });
        self
    }

    /// Register a provider that fails during registration
    pub fn failing_provider(mut self, message: &str) -> Self {
        self.steps.push(ScenarioStep::RegisterFailingProvider {
            message: message.to_string(),
        });
        self
    }

    // ===== Run configuration =====

    /// Apply a default per-test time budget
    pub fn default_timeout(mut self, limit: Duration) -> Self {
        self.steps.push(ScenarioStep::DefaultTimeout { limit });
        self
    }

    /// Seed a variable in the orchestrating thread's cache partition
    pub fn set_var(mut self, key: &str, value: Value) -> Self {
        self.steps.push(ScenarioStep::SetVar {
            key: key.to_string(),
            value,
        });
        self
    }

    /// Clear the orchestrating thread's cache partition
    pub fn clear_vars(mut self) -> Self {
        self.steps.push(ScenarioStep::ClearVars);
        self
    }

    // ===== Engine execution =====

    /// Run every registered suite
    pub fn run_suites(mut self) -> Self {
        self.steps.push(ScenarioStep::Run);
        self
    }

    // ===== Assertions =====

    /// Add a general assertion
    pub fn assert(mut self, assertion: Assertion) -> Self {
        self.steps.push(ScenarioStep::Assert { assertion });
        self
    }

    /// Assert total test count
    pub fn assert_total(self, total: usize) -> Self {
        self.assert(Assertion::TotalIs(total))
    }

    /// Assert passed test count
    pub fn assert_passed(self, passed: usize) -> Self {
        self.assert(Assertion::PassedIs(passed))
    }

    /// Assert failed test count
    pub fn assert_failed(self, failed: usize) -> Self {
        self.assert(Assertion::FailedIs(failed))
    }

    /// Assert the two-decimal pass rate, e.g. "66.67"
    pub fn assert_pass_rate(self, rate: &str) -> Self {
        self.assert(Assertion::PassRateIs(rate.to_string()))
    }

    /// Assert the run completed
    pub fn assert_completed(self) -> Self {
        self.assert(Assertion::Completed)
    }

    /// Assert registration failed before any test ran
    pub fn assert_discovery_error(self) -> Self {
        self.assert(Assertion::DiscoveryError)
    }

    /// Assert a failure message fragment for a specific test
    pub fn assert_failure_contains(self, test: &str, fragment: &str) -> Self {
        self.assert(Assertion::FailureMessageContains {
            test: test.to_string(),
            fragment: fragment.to_string(),
        })
    }

    /// Assert a cache variable value
    pub fn assert_var(self, key: &str, value: Value) -> Self {
        self.assert(Assertion::VarEquals {
            key: key.to_string(),
            value,
        })
    }

    /// Assert a cache variable is absent
    pub fn assert_var_absent(self, key: &str) -> Self {
        self.assert(Assertion::VarAbsent {
            key: key.to_string(),
        })
    }

    // ===== Execution =====

    /// Execute the scenario and return results
    pub fn run(self) -> ScenarioResult {
        let mut runner = ScenarioRunner::new();
        let total_steps = self.steps.len();

        match runner.execute(self.steps) {
            Ok(()) => ScenarioResult {
                name: self.name,
                success: true,
                steps_executed: total_steps,
                failure_step: None,
                error: None,
            },
            Err(e) => {
                let failure_step = runner.current_step();
                ScenarioResult {
                    name: self.name,
                    success: false,
                    steps_executed: failure_step,
                    failure_step: Some(failure_step),
                    error: Some(format!("{:?}", e)),
                }
            }
        }
    }
}

/// Result of running a scenario
#[derive(Debug)]
pub struct ScenarioResult {
    pub name: String,
    pub success: bool,
    pub steps_executed: usize,
    pub failure_step: Option<usize>,
    pub error: Option<String>,
}

impl ScenarioResult {
    /// Unwrap the result, panicking if it failed
    pub fn unwrap(self) {
        if !self.success {
            panic!(
                "Scenario '{}' failed at step {}: {}",
                self.name,
                self.failure_step.unwrap_or(0),
                self.error.unwrap_or_else(|| "unknown error".to_string())
            );
        }
    }

    /// Expect the result to be successful
    pub fn expect(self, msg: &str) {
        if !self.success {
            panic!(
                "{}: Scenario '{}' failed at step {}: {}",
                msg,
                self.name,
                self.failure_step.unwrap_or(0),
                self.error.unwrap_or_else(|| "unknown error".to_string())
            );
        }
    }
}
