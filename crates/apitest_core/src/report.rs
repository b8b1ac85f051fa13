//! Run results and the machine-readable report.

use crate::case::CaseResult;
use serde::Serialize;
use std::time::Duration;
use uuid::Uuid;

/// Aggregated counters for one whole run.
///
/// Owned by the [`TestContext`](crate::TestContext); mutated only by the
/// top-level run loop, never by individual tests.
#[derive(Debug, Clone, Default)]
pub struct TestResult {
    /// Number of test methods executed (ignored methods excluded).
    pub total: usize,
    /// Tests that completed without error.
    pub passed: usize,
    /// Tests that failed for any reason (assertion, timeout, missing
    /// argument, transport).
    pub failed: usize,
    /// Wall time for the whole run.
    pub elapsed: Duration,
}

impl TestResult {
    /// Folds one case's counters into the totals.
    pub fn absorb(&mut self, case: &CaseResult) {
        self.total += case.total;
        self.passed += case.passed;
        self.failed += case.failed;
    }

    /// Pass rate as a percentage. Zero when nothing ran.
    pub fn pass_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.passed as f64 / self.total as f64) * 100.0
        }
    }

    /// One-line human summary.
    pub fn summary(&self) -> String {
        format!(
            "total {}, passed {}, failed {}, pass rate {:.2}%, elapsed {:.2}s",
            self.total,
            self.passed,
            self.failed,
            self.pass_rate(),
            self.elapsed.as_secs_f64()
        )
    }
}

/// Machine-readable run report.
///
/// The fields mirror [`TestResult`] exactly, plus a run identifier and
/// the per-case breakdown.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Unique identifier for this run.
    pub run_id: Uuid,
    /// Number of test methods executed.
    pub total: usize,
    /// Tests that passed.
    pub passed: usize,
    /// Tests that failed.
    pub failed: usize,
    /// Pass rate percentage, rounded to two decimals.
    pub pass_rate: f64,
    /// Wall time for the whole run in milliseconds.
    pub elapsed_ms: u64,
    /// Per-case breakdown.
    pub cases: Vec<CaseReport>,
}

/// Per-case section of the run report.
#[derive(Debug, Clone, Serialize)]
pub struct CaseReport {
    /// Suite name.
    pub name: String,
    /// Tests executed in this case.
    pub total: usize,
    /// Tests that passed.
    pub passed: usize,
    /// Tests that failed.
    pub failed: usize,
    /// Failed test names with their messages.
    pub failures: Vec<FailureReport>,
}

/// One failed test inside a case report.
#[derive(Debug, Clone, Serialize)]
pub struct FailureReport {
    /// Test method name.
    pub test: String,
    /// Failure message.
    pub message: String,
}

impl RunReport {
    /// Builds the report from a finished run.
    pub fn new(result: &TestResult, cases: &[CaseResult]) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            total: result.total,
            passed: result.passed,
            failed: result.failed,
            pass_rate: (result.pass_rate() * 100.0).round() / 100.0,
            elapsed_ms: result.elapsed.as_millis() as u64,
            cases: cases
                .iter()
                .map(|case| CaseReport {
                    name: case.name.clone(),
                    total: case.total,
                    passed: case.passed,
                    failed: case.failed,
                    failures: case
                        .failures
                        .iter()
                        .map(|f| FailureReport {
                            test: f.test.clone(),
                            message: f.message.clone(),
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}
