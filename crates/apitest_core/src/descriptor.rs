//! Test method descriptors.
//!
//! A [`TestMethod`] carries an explicit role discriminant plus modifier
//! fields, attached to the body at registration time. Classification
//! reads the role; modifiers are resolved separately by [`compose`].
//! Because role and modifiers are distinct fields, a test with a repeat
//! or timeout modifier is still classified as a test — stacking can
//! never hide behavior from the classifier.
//!
//! [`compose`]: TestMethod::compose

use crate::args::DataSet;
use crate::caller::{ApiRequest, Caller, MockCaller};
use crate::wrap::{self, TestFn};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Place of a registered method in the suite lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// A test method, run once per suite pass.
    Test,
    /// Runs before every test method.
    Setup,
    /// Runs after every test method, even when the test failed.
    Teardown,
    /// Runs once before the first test method.
    SetupClass,
    /// Runs once after the last test method.
    TeardownClass,
    /// Excluded from the run entirely: never counted, never invoked.
    Ignore,
}

/// A registered callable plus its role and modifiers.
///
/// Immutable after registration; owned by exactly one
/// [`TestCase`](crate::TestCase).
#[derive(Clone)]
pub struct TestMethod {
    name: String,
    role: Role,
    params: Vec<String>,
    timeout: Option<Duration>,
    repeat: Option<u32>,
    data_sets: Vec<DataSet>,
    capture_output: bool,
    inject_params: bool,
    api: Option<ApiRequest>,
    mock: Option<MockCaller>,
    body: TestFn,
}

impl TestMethod {
    fn new(name: impl Into<String>, role: Role, body: TestFn) -> Self {
        Self {
            name: name.into(),
            role,
            params: Vec::new(),
            timeout: None,
            repeat: None,
            data_sets: Vec::new(),
            capture_output: false,
            inject_params: false,
            api: None,
            mock: None,
            body,
        }
    }

    /// Registers a test method.
    pub fn test<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(crate::Invocation) -> crate::Result<Value> + Send + Sync + 'static,
    {
        Self::new(name, Role::Test, wrap::body(f))
    }

    /// Registers the per-test setup method.
    pub fn setup<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(crate::Invocation) -> crate::Result<Value> + Send + Sync + 'static,
    {
        Self::new(name, Role::Setup, wrap::body(f))
    }

    /// Registers the per-test teardown method.
    pub fn teardown<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(crate::Invocation) -> crate::Result<Value> + Send + Sync + 'static,
    {
        Self::new(name, Role::Teardown, wrap::body(f))
    }

    /// Registers the once-per-suite setup method.
    pub fn setup_class<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(crate::Invocation) -> crate::Result<Value> + Send + Sync + 'static,
    {
        Self::new(name, Role::SetupClass, wrap::body(f))
    }

    /// Registers the once-per-suite teardown method.
    pub fn teardown_class<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(crate::Invocation) -> crate::Result<Value> + Send + Sync + 'static,
    {
        Self::new(name, Role::TeardownClass, wrap::body(f))
    }

    /// Registers an ignored method. It is dropped at classification and
    /// composes to a no-op.
    pub fn ignored<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(crate::Invocation) -> crate::Result<Value> + Send + Sync + 'static,
    {
        Self::new(name, Role::Ignore, wrap::body(f))
    }

    /// Sets the per-test time budget.
    pub fn with_timeout(mut self, limit: Duration) -> Self {
        self.timeout = Some(limit);
        self
    }

    /// Runs the body `times` times per invocation.
    pub fn with_repeat(mut self, times: u32) -> Self {
        self.repeat = Some(times);
        self
    }

    /// Expands the body over literal data sets.
    pub fn with_data(mut self, sets: impl IntoIterator<Item = DataSet>) -> Self {
        self.data_sets = sets.into_iter().collect();
        self
    }

    /// Declares the body's parameter names, used by cache injection.
    pub fn with_params<S: Into<String>>(mut self, params: impl IntoIterator<Item = S>) -> Self {
        self.params = params.into_iter().map(Into::into).collect();
        self
    }

    /// Captures a mapping return value into the variable cache.
    pub fn capture(mut self) -> Self {
        self.capture_output = true;
        self
    }

    /// Injects cached values for declared parameters left unbound.
    pub fn inject(mut self) -> Self {
        self.inject_params = true;
        self
    }

    /// Attaches a declarative request executed before the body runs.
    pub fn with_api(mut self, spec: ApiRequest) -> Self {
        self.api = Some(spec);
        self
    }

    /// Overrides the run's caller with a fixed mock response for this
    /// method only.
    pub fn with_mock(mut self, mock: MockCaller) -> Self {
        self.mock = Some(mock);
        self
    }

    /// Method name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Role discriminant read by classification.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Declared parameter names.
    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// Resolves the effective callable for this method.
    ///
    /// Modifiers are applied in a fixed canonical order, outermost
    /// first: capture, inject, timeout, repeat, data, api call, body.
    /// Capture and inject sit outside the timeout so cache reads and
    /// writes happen on the orchestrating thread's partition; only the
    /// body (and the api call) run on the budget worker, whose own
    /// cache writes stay isolated. `default_timeout` applies only when
    /// the method has no budget of its own.
    pub fn compose(
        &self,
        caller: Arc<dyn Caller>,
        default_timeout: Option<Duration>,
    ) -> TestFn {
        if self.role == Role::Ignore {
            return wrap::ignored();
        }

        let mut f = self.body.clone();

        if let Some(spec) = &self.api {
            let effective: Arc<dyn Caller> = match &self.mock {
                Some(mock) => Arc::new(mock.clone()),
                None => caller,
            };
            f = wrap::api_call(f, spec.clone(), effective);
        }
        if !self.data_sets.is_empty() {
            f = wrap::data(f, self.data_sets.clone());
        }
        if let Some(times) = self.repeat {
            f = wrap::repeat(f, times);
        }
        if let Some(limit) = self.timeout.or(default_timeout) {
            f = wrap::timeout(f, limit, &self.name);
        }
        if self.inject_params {
            f = wrap::inject(f, self.params.clone());
        }
        if self.capture_output {
            f = wrap::capture(f);
        }

        f
    }
}

// Manual Debug implementation to skip the body closure.
impl std::fmt::Debug for TestMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestMethod")
            .field("name", &self.name)
            .field("role", &self.role)
            .field("params", &self.params)
            .field("timeout", &self.timeout)
            .field("repeat", &self.repeat)
            .field("data_sets", &self.data_sets.len())
            .field("capture_output", &self.capture_output)
            .field("inject_params", &self.inject_params)
            .field("api", &self.api.is_some())
            .field("mock", &self.mock.is_some())
            .finish()
    }
}
