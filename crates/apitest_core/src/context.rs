//! Test context: suite registration, orchestration, and aggregation.
//!
//! Suites are registered explicitly (directly or through providers);
//! there is no runtime reflection. Registration failures are fatal —
//! no partial suite is meaningful — while failures inside tests are
//! always absorbed one level down, at the case boundary.

use crate::cache::VarCache;
use crate::caller::{Caller, HttpCaller};
use crate::case::{CaseResult, TestCase};
use crate::config::Config;
use crate::error::{ApiTestError, Result};
use crate::report::{RunReport, TestResult};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Shared state for one execution pass.
///
/// Owns the run's variable cache (one cache per context, not a global)
/// and the caller handed to API-bound test methods. Dropping the context
/// is the cache's teardown.
#[derive(Clone)]
pub struct RunContext {
    vars: Arc<VarCache>,
    caller: Arc<dyn Caller>,
    default_timeout: Option<Duration>,
}

impl RunContext {
    /// Context with a fresh cache, a live HTTP caller, and no default
    /// time budget.
    pub fn new() -> Self {
        Self {
            vars: Arc::new(VarCache::new()),
            caller: Arc::new(HttpCaller::new()),
            default_timeout: None,
        }
    }

    /// Builds a context from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            vars: Arc::new(VarCache::new()),
            caller: Arc::new(HttpCaller::from_config(&config.http)?),
            default_timeout: config.run.default_timeout(),
        })
    }

    /// Replaces the caller (e.g. with a mock for offline runs).
    pub fn with_caller(mut self, caller: Arc<dyn Caller>) -> Self {
        self.caller = caller;
        self
    }

    /// Sets the default per-test time budget.
    pub fn with_default_timeout(mut self, limit: Duration) -> Self {
        self.default_timeout = Some(limit);
        self
    }

    /// The run's variable cache.
    pub fn vars(&self) -> Arc<VarCache> {
        self.vars.clone()
    }

    /// The caller for API-bound methods.
    pub fn caller(&self) -> Arc<dyn Caller> {
        self.caller.clone()
    }

    /// Default time budget applied to tests without one of their own.
    pub fn default_timeout(&self) -> Option<Duration> {
        self.default_timeout
    }
}

impl Default for RunContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of a whole run: the aggregate plus per-case detail.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// Aggregated counters and elapsed wall time.
    pub result: TestResult,
    /// Per-case results in execution order.
    pub cases: Vec<CaseResult>,
}

impl RunOutcome {
    /// Machine-readable report for this outcome.
    pub fn report(&self) -> RunReport {
        RunReport::new(&self.result, &self.cases)
    }
}

/// Top-level registration and orchestration unit.
#[derive(Debug)]
pub struct TestContext {
    cases: Vec<TestCase>,
}

impl TestContext {
    /// Empty context.
    pub fn new() -> Self {
        Self { cases: Vec::new() }
    }

    /// Registers a suite. Suites run in registration order.
    pub fn register(&mut self, case: TestCase) {
        tracing::debug!(case = case.name(), tests = case.test_count(), "registered suite");
        self.cases.push(case);
    }

    /// Builds a context from suite providers.
    ///
    /// A provider failure aborts registration with
    /// [`ApiTestError::Discovery`] before any test runs.
    pub fn from_providers<I, F>(providers: I) -> Result<Self>
    where
        I: IntoIterator<Item = F>,
        F: Fn() -> Result<TestCase>,
    {
        let mut context = Self::new();
        for provider in providers {
            let case = provider().map_err(|e| match e {
                ApiTestError::Discovery(_) => e,
                other => ApiTestError::Discovery(other.to_string()),
            })?;
            context.register(case);
        }
        Ok(context)
    }

    /// Registered suite names in execution order.
    pub fn case_names(&self) -> impl Iterator<Item = &str> {
        self.cases.iter().map(TestCase::name)
    }

    /// Number of registered suites.
    pub fn case_count(&self) -> usize {
        self.cases.len()
    }

    /// Runs every registered suite in order and aggregates the result.
    ///
    /// Individual test failures are absorbed by the case layer; this
    /// method itself never fails.
    pub fn run(&self, ctx: &RunContext) -> RunOutcome {
        let started = Instant::now();
        let mut result = TestResult::default();
        let mut cases = Vec::with_capacity(self.cases.len());

        tracing::info!(suites = self.cases.len(), "starting run");
        for case in &self.cases {
            let case_result = case.run(ctx);
            result.absorb(&case_result);
            cases.push(case_result);
        }
        result.elapsed = started.elapsed();
        tracing::info!(summary = %result.summary(), "run finished");

        RunOutcome { result, cases }
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
