//! Execution wrappers.
//!
//! Each combinator takes a callable and returns a callable with one
//! behavior added around it, so wrappers stack in whatever order the
//! author composes them: calls flow outside-in, return values flow
//! inside-out. [`TestMethod::compose`](crate::TestMethod::compose)
//! applies them in a fixed canonical order; the combinators themselves
//! are order-agnostic.

use crate::args::{CallArgs, DataSet, Invocation};
use crate::caller::{ApiRequest, Caller};
use crate::error::{ApiTestError, Result};
use serde_json::Value;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::{Duration, Instant};

/// The callable type every wrapper consumes and produces.
pub type TestFn = Arc<dyn Fn(Invocation) -> Result<Value> + Send + Sync>;

/// Wraps a plain closure into a [`TestFn`].
pub fn body<F>(f: F) -> TestFn
where
    F: Fn(Invocation) -> Result<Value> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// A no-op callable: returns `Value::Null` without running anything.
///
/// This is what an ignored method composes to, so invoking it directly
/// is harmless regardless of arguments.
pub fn ignored() -> TestFn {
    Arc::new(|_inv| Ok(Value::Null))
}

/// Enforces a per-test time budget.
///
/// The inner callable runs on a dedicated worker thread while the
/// calling thread blocks up to `limit`. On expiry the call fails with
/// [`ApiTestError::Timeout`] and the cooperative cancellation token is
/// tripped; the worker itself is not terminated. It keeps running
/// detached and its eventual result is discarded, as are its variable
/// cache writes (they land in the worker's partition).
pub fn timeout(inner: TestFn, limit: Duration, name: &str) -> TestFn {
    let name = name.to_string();
    Arc::new(move |inv: Invocation| {
        let started = Instant::now();
        let (tx, rx) = mpsc::channel();
        let worker_inner = inner.clone();
        let worker_inv = inv.clone();

        thread::Builder::new()
            .name(format!("apitest-{}", name))
            .spawn(move || {
                let _ = tx.send(worker_inner(worker_inv));
            })
            .map_err(|_| ApiTestError::WorkerSpawn(name.clone()))?;

        match rx.recv_timeout(limit) {
            Ok(result) => {
                tracing::info!(
                    test = %name,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "test completed within budget"
                );
                result
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {
                inv.cancelled().cancel();
                tracing::warn!(test = %name, limit_secs = limit.as_secs(), "test exceeded budget, worker leaked");
                Err(ApiTestError::Timeout {
                    test: name.clone(),
                    limit_secs: limit.as_secs(),
                })
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(ApiTestError::WorkerLost(name.clone())),
        }
    })
}

/// Invokes the inner callable `times` times sequentially in the calling
/// thread. Returns the ordered results; the first failure aborts the
/// remaining iterations.
pub fn repeat(inner: TestFn, times: u32) -> TestFn {
    Arc::new(move |inv: Invocation| {
        let mut results = Vec::with_capacity(times as usize);
        for iteration in 1..=times {
            tracing::debug!(iteration, times, "repeat iteration");
            results.push(inner(inv.clone())?);
        }
        Ok(Value::Array(results))
    })
}

/// Expands the inner callable into one invocation per data set.
///
/// Each set is bound into the invocation's arguments (positional for
/// sequences, named for mappings, sole argument otherwise); arguments
/// already bound on the outer invocation remain visible as defaults.
/// Returns the ordered per-set results; the first failure aborts the
/// remaining sets.
pub fn data(inner: TestFn, sets: Vec<DataSet>) -> TestFn {
    Arc::new(move |inv: Invocation| {
        let mut results = Vec::with_capacity(sets.len());
        for (index, set) in sets.iter().enumerate() {
            tracing::debug!(set = index + 1, total = sets.len(), "data set");
            let mut call = inv.clone();
            let mut args = CallArgs::from_data_set(set);
            args.merge_defaults(&inv.args);
            call.args = args;
            results.push(inner(call)?);
        }
        Ok(Value::Array(results))
    })
}

/// Captures a mapping result into the variable cache.
///
/// Iff the inner callable returns a JSON object, every key/value pair is
/// written into the calling thread's cache partition, overwriting prior
/// values. The result passes through unchanged either way.
pub fn capture(inner: TestFn) -> TestFn {
    Arc::new(move |inv: Invocation| {
        let vars = inv.vars.clone();
        let result = inner(inv)?;
        if let Value::Object(map) = &result {
            for (key, value) in map {
                vars.set(key, value.clone());
            }
            tracing::debug!(keys = map.len(), "captured output into variable cache");
        }
        Ok(result)
    })
}

/// Injects cached values for declared parameters the caller left unbound.
///
/// For every name in `params` that is absent from the invocation's named
/// arguments, the calling thread's cache partition is consulted; a hit is
/// bound as a default. Caller-supplied arguments are never overridden,
/// and cache misses are silently skipped (a later `require` surfaces
/// [`ApiTestError::MissingArgument`]).
pub fn inject(inner: TestFn, params: Vec<String>) -> TestFn {
    Arc::new(move |mut inv: Invocation| {
        for param in &params {
            if !inv.args.contains(param) {
                if let Some(value) = inv.vars.get(param) {
                    tracing::debug!(param = %param, "injected argument from variable cache");
                    inv.args.set_default(param, value);
                }
            }
        }
        inner(inv)
    })
}

/// Executes a declarative request before the body runs.
///
/// The spec is resolved (variable substitution), handed to the caller,
/// and the response triple is bound into the invocation's named
/// arguments as `status_code`, `response_body`, and `response_json`.
pub fn api_call(inner: TestFn, spec: ApiRequest, caller: Arc<dyn Caller>) -> TestFn {
    Arc::new(move |mut inv: Invocation| {
        let request = spec.resolve(&inv);
        let response = caller.call(&request)?;

        inv.args.set("status_code", Value::from(response.status));
        inv.args.set("response_body", Value::String(response.body));
        inv.args
            .set("response_json", response.json.unwrap_or(Value::Null));

        inner(inv)
    })
}
