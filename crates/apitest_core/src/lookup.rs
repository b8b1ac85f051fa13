//! Chained, never-panicking access into nested JSON.
//!
//! Response bodies are deeply nested and frequently absent; `Lookup`
//! lets a test body walk `body.address.city` style paths without
//! unwrapping at every hop. A missing key or out-of-range index yields
//! an empty lookup that keeps absorbing further hops.

use serde_json::Value;

/// A borrowed view into a JSON document, or nothing.
#[derive(Debug, Clone, Copy)]
pub struct Lookup<'a> {
    value: Option<&'a Value>,
}

impl<'a> Lookup<'a> {
    /// Roots a lookup at a value.
    pub fn new(value: &'a Value) -> Self {
        Self { value: Some(value) }
    }

    /// The empty lookup.
    pub fn missing() -> Self {
        Self { value: None }
    }

    /// Descends into an object field.
    pub fn key(self, name: &str) -> Lookup<'a> {
        Lookup {
            value: self.value.and_then(|v| v.get(name)),
        }
    }

    /// Descends into an array element.
    pub fn at(self, index: usize) -> Lookup<'a> {
        Lookup {
            value: self.value.and_then(|v| v.get(index)),
        }
    }

    /// True when the path resolved to a present, non-null value.
    pub fn exists(&self) -> bool {
        matches!(self.value, Some(v) if !v.is_null())
    }

    /// The resolved value, if any.
    pub fn value(&self) -> Option<&'a Value> {
        self.value
    }

    /// String view of the resolved value.
    pub fn as_str(&self) -> Option<&'a str> {
        self.value.and_then(Value::as_str)
    }

    /// Integer view of the resolved value.
    pub fn as_i64(&self) -> Option<i64> {
        self.value.and_then(Value::as_i64)
    }

    /// Boolean view of the resolved value.
    pub fn as_bool(&self) -> Option<bool> {
        self.value.and_then(Value::as_bool)
    }
}

impl std::fmt::Display for Lookup<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.value {
            Some(value) => write!(f, "{}", value),
            None => write!(f, "<missing>"),
        }
    }
}
