//! Call arguments and per-call invocation context.

use crate::cache::VarCache;
use crate::error::{ApiTestError, Result};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// One literal parameter set for a data-driven test.
#[derive(Debug, Clone, PartialEq)]
pub enum DataSet {
    /// An ordered sequence, splatted as positional arguments.
    Positional(Vec<Value>),
    /// A mapping, splatted as named arguments.
    Named(Map<String, Value>),
    /// Any other value, passed as the sole argument.
    Single(Value),
}

impl DataSet {
    /// Builds a data set from an arbitrary JSON value, classifying arrays
    /// as positional and objects as named.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Array(items) => DataSet::Positional(items),
            Value::Object(map) => DataSet::Named(map),
            other => DataSet::Single(other),
        }
    }
}

/// Arguments bound to a single invocation of a test body.
///
/// Named arguments are the primary currency: data sets, cache injection,
/// and the API-call wrapper all communicate through them. Positional
/// arguments carry `DataSet::Positional` entries for bodies that want
/// ordered values.
#[derive(Debug, Clone, Default)]
pub struct CallArgs {
    positional: Vec<Value>,
    named: BTreeMap<String, Value>,
}

impl CallArgs {
    /// Empty argument set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a data set into a fresh argument set.
    pub fn from_data_set(set: &DataSet) -> Self {
        let mut args = Self::new();
        match set {
            DataSet::Positional(items) => args.positional = items.clone(),
            DataSet::Named(map) => {
                for (k, v) in map {
                    args.named.insert(k.clone(), v.clone());
                }
            }
            DataSet::Single(value) => args.positional = vec![value.clone()],
        }
        args
    }

    /// Sets a named argument, overwriting any existing binding.
    pub fn set(&mut self, name: &str, value: Value) {
        self.named.insert(name.to_string(), value);
    }

    /// Sets a named argument only when the caller has not already bound it.
    ///
    /// Injection uses this so caller-supplied arguments are never
    /// overridden.
    pub fn set_default(&mut self, name: &str, value: Value) {
        self.named.entry(name.to_string()).or_insert(value);
    }

    /// Looks up a named argument.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.named.get(name)
    }

    /// True when the caller bound `name` explicitly.
    pub fn contains(&self, name: &str) -> bool {
        self.named.contains_key(name)
    }

    /// Positional argument at `index`, if present.
    pub fn pos(&self, index: usize) -> Option<&Value> {
        self.positional.get(index)
    }

    /// All positional arguments in order.
    pub fn positional(&self) -> &[Value] {
        &self.positional
    }

    /// Named argument names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.named.keys().map(String::as_str)
    }

    /// Copies every named argument of `other` that this set does not
    /// already bind.
    pub fn merge_defaults(&mut self, other: &CallArgs) {
        for (name, value) in &other.named {
            self.named.entry(name.clone()).or_insert_with(|| value.clone());
        }
    }
}

/// Cooperative cancellation token.
///
/// The timeout wrapper trips the token when the budget expires. A test
/// body that polls [`CancelToken::is_cancelled`] can stop promptly; a
/// body that ignores it keeps running detached, which is the documented
/// leak.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Fresh, untripped token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Trips the token.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// True once the token has been tripped.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Per-call context handed to a test body.
///
/// Cloning is cheap: arguments are cloned by value, the cache and the
/// cancellation token are shared. Wrappers clone the invocation when they
/// re-invoke the inner callable (repeat, data) or hand it to the timeout
/// worker thread.
#[derive(Debug, Clone)]
pub struct Invocation {
    /// Name of the test method being invoked.
    pub test: String,
    /// Arguments bound for this call.
    pub args: CallArgs,
    /// The run's variable cache (thread-partitioned).
    pub vars: Arc<VarCache>,
    cancel: CancelToken,
}

impl Invocation {
    /// Builds an invocation for `test` with empty arguments.
    pub fn new(test: impl Into<String>, vars: Arc<VarCache>) -> Self {
        Self {
            test: test.into(),
            args: CallArgs::new(),
            vars,
            cancel: CancelToken::new(),
        }
    }

    /// Returns the named argument or fails with
    /// [`ApiTestError::MissingArgument`].
    pub fn require(&self, name: &str) -> Result<&Value> {
        self.args
            .get(name)
            .ok_or_else(|| ApiTestError::MissingArgument {
                test: self.test.clone(),
                name: name.to_string(),
            })
    }

    /// The cooperative cancellation token for this call.
    pub fn cancelled(&self) -> &CancelToken {
        &self.cancel
    }
}
