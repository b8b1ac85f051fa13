//! Error types for apitest_core operations.

use thiserror::Error;

/// Core error type for apitest_core operations.
#[derive(Error, Debug)]
pub enum ApiTestError {
    /// An assertion helper rejected the observed value.
    #[error("assertion failed: {0}")]
    Assertion(String),

    /// A test exceeded its time budget.
    ///
    /// The worker thread running the test body is not cancelled; it keeps
    /// running detached and its result is discarded.
    #[error("test '{test}' exceeded the time limit of {limit_secs} seconds")]
    Timeout {
        /// Name of the test that overran.
        test: String,
        /// The configured budget in seconds.
        limit_secs: u64,
    },

    /// A suite provider failed while building its test case.
    ///
    /// Fatal: no partial suite is meaningful without successful
    /// registration, so the whole run is aborted.
    #[error("suite registration failed: {0}")]
    Discovery(String),

    /// A required parameter was neither supplied by the caller nor
    /// resolvable from the variable cache.
    #[error("test '{test}' is missing required argument '{name}'")]
    MissingArgument {
        /// Name of the test that was invoked.
        test: String,
        /// The unresolved parameter name.
        name: String,
    },

    /// The HTTP transport failed before a response was produced.
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A request spec could not be turned into a real request.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Configuration error (loading, parsing, invalid values).
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The timeout worker thread could not be spawned.
    #[error("failed to spawn worker for test '{0}'")]
    WorkerSpawn(String),

    /// The timeout worker terminated without producing a result.
    #[error("worker for test '{0}' terminated without producing a result")]
    WorkerLost(String),
}

impl ApiTestError {
    /// Returns a user-friendly recovery suggestion for the error, if available.
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            Self::Timeout { .. } => {
                Some("Raise the timeout budget, or have the test body poll Invocation::cancelled() so it can stop cooperatively.")
            }
            Self::Discovery(_) => {
                Some("Fix the failing suite provider; no tests run until every registered suite builds.")
            }
            Self::MissingArgument { .. } => {
                Some("Supply the argument in a data set, or have an earlier test capture it into the variable cache.")
            }
            Self::Config(_) => Some("Check apitest.toml for syntax errors or invalid values."),
            _ => None,
        }
    }

    /// True when the error is absorbed at the test-case boundary rather
    /// than aborting the run.
    pub fn is_test_local(&self) -> bool {
        !matches!(self, Self::Discovery(_) | Self::Config(_))
    }
}

/// Convenience Result type for apitest_core operations.
pub type Result<T> = std::result::Result<T, ApiTestError>;
