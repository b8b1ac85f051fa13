use super::assertions::Assertion;
use super::steps::ScenarioStep;
use anyhow::{anyhow, Context, Result};
use apitest_core::{ApiTestError, RunContext, RunOutcome, TestContext};
use serde_json::Value;

/// Executes scenarios against a real engine instance
pub struct ScenarioRunner {
    pending: Vec<std::result::Result<apitest_core::TestCase, String>>,
    run_ctx: RunContext,
    outcome: Option<RunOutcome>,
    discovery_error: Option<String>,
    current_step: usize,
}

impl ScenarioRunner {
    /// Create a new runner with an empty registration list
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            run_ctx: RunContext::new(),
            outcome: None,
            discovery_error: None,
            current_step: 0,
        }
    }

    /// Get current step number
    pub fn current_step(&self) -> usize {
        self.current_step
    }

    /// Execute all steps in sequence
    pub fn execute(&mut self, steps: Vec<ScenarioStep>) -> Result<()> {
        for (i, step) in steps.into_iter().enumerate() {
            self.current_step = i;
            let label = format!("Step {}: {:?}", i, step);
            self.execute_step(step).with_context(|| label)?;
        }
        Ok(())
    }

    /// Execute a single step
    fn execute_step(&mut self, step: ScenarioStep) -> Result<()> {
        match step {
            ScenarioStep::RegisterSuite { case } => {
                self.pending.push(Ok(case));
                Ok(())
            }
            ScenarioStep::RegisterFailingProvider { message } => {
                self.pending.push(Err(message));
                Ok(())
            }
            ScenarioStep::DefaultTimeout { limit } => {
                self.run_ctx = self.run_ctx.clone().with_default_timeout(limit);
                Ok(())
            }
            ScenarioStep::SetVar { key, value } => {
                self.run_ctx.vars().set(&key, value);
                Ok(())
            }
            ScenarioStep::ClearVars => {
                self.run_ctx.vars().clear();
                Ok(())
            }
            ScenarioStep::Run => self.handle_run(),
            ScenarioStep::Assert { assertion } => self.handle_assertion(&assertion),
        }
    }

    // ===== Execution =====

    fn handle_run(&mut self) -> Result<()> {
        let mut context = TestContext::new();
        for entry in self.pending.drain(..) {
            match entry {
                Ok(case) => context.register(case),
                Err(message) => {
                    // Fail fast: a broken provider aborts registration
                    // before any test executes.
                    self.discovery_error =
                        Some(ApiTestError::Discovery(message).to_string());
                    return Ok(());
                }
            }
        }
        self.outcome = Some(context.run(&self.run_ctx));
        Ok(())
    }

    // ===== Assertions =====

    fn outcome(&self) -> Result<&RunOutcome> {
        self.outcome
            .as_ref()
            .ok_or_else(|| anyhow!("No run outcome available (did the scenario call run_suites?)"))
    }

    fn handle_assertion(&mut self, assertion: &Assertion) -> Result<()> {
        match assertion {
            Assertion::TotalIs(expected) => {
                let actual = self.outcome()?.result.total;
                if actual != *expected {
                    return Err(anyhow!("total mismatch: expected {}, got {}", expected, actual));
                }
                Ok(())
            }
            Assertion::PassedIs(expected) => {
                let actual = self.outcome()?.result.passed;
                if actual != *expected {
                    return Err(anyhow!("passed mismatch: expected {}, got {}", expected, actual));
                }
                Ok(())
            }
            Assertion::FailedIs(expected) => {
                let actual = self.outcome()?.result.failed;
                if actual != *expected {
                    return Err(anyhow!("failed mismatch: expected {}, got {}", expected, actual));
                }
                Ok(())
            }
            Assertion::PassRateIs(expected) => {
                let actual = format!("{:.2}", self.outcome()?.result.pass_rate());
                if actual != *expected {
                    return Err(anyhow!(
                        "pass rate mismatch: expected {}, got {}",
                        expected,
                        actual
                    ));
                }
                Ok(())
            }
            Assertion::Completed => {
                if self.outcome.is_none() {
                    return Err(anyhow!("expected the run to complete, but it never ran"));
                }
                Ok(())
            }
            Assertion::DiscoveryError => match &self.discovery_error {
                Some(_) if self.outcome.is_none() => Ok(()),
                Some(_) => Err(anyhow!("discovery failed but tests still ran")),
                None => Err(anyhow!("expected a discovery error, but registration succeeded")),
            },
            Assertion::CaseCount(expected) => {
                let actual = self.outcome()?.cases.len();
                if actual != *expected {
                    return Err(anyhow!(
                        "case count mismatch: expected {}, got {}",
                        expected,
                        actual
                    ));
                }
                Ok(())
            }
            Assertion::CaseFailedIs { case, failed } => {
                let outcome = self.outcome()?;
                let found = outcome
                    .cases
                    .iter()
                    .find(|c| c.name == *case)
                    .ok_or_else(|| anyhow!("no case named '{}' in outcome", case))?;
                if found.failed != *failed {
                    return Err(anyhow!(
                        "case '{}' failed mismatch: expected {}, got {}",
                        case,
                        failed,
                        found.failed
                    ));
                }
                Ok(())
            }
            Assertion::FailureMessageContains { test, fragment } => {
                let outcome = self.outcome()?;
                let failure = outcome
                    .cases
                    .iter()
                    .flat_map(|c| c.failures.iter())
                    .find(|f| f.test == *test)
                    .ok_or_else(|| anyhow!("no recorded failure for test '{}'", test))?;
                if !failure.message.contains(fragment) {
                    return Err(anyhow!(
                        "failure message for '{}' doesn't contain '{}': {}",
                        test,
                        fragment,
                        failure.message
                    ));
                }
                Ok(())
            }
            Assertion::VarEquals { key, value } => {
                match self.run_ctx.vars().get(key) {
                    Some(actual) if actual == *value => Ok(()),
                    Some(actual) => Err(anyhow!(
                        "variable '{}' mismatch: expected {}, got {}",
                        key,
                        value,
                        actual
                    )),
                    None => Err(anyhow!("variable '{}' not set", key)),
                }
            }
            Assertion::VarAbsent { key } => match self.run_ctx.vars().get(key) {
                None => Ok(()),
                Some(actual) => Err(anyhow!(
                    "variable '{}' unexpectedly set to {}",
                    key,
                    actual
                )),
            },
            Assertion::Custom(f) => {
                let outcome = self.outcome()?;
                f(outcome)
            }
        }
    }

    /// Direct cache read for custom checks.
    pub fn var(&self, key: &str) -> Option<Value> {
        self.run_ctx.vars().get(key)
    }
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::new()
    }
}
