//! The Caller boundary: declarative requests, live HTTP, and mocks.
//!
//! A test method carries a declarative [`ApiRequest`]; at invocation time
//! the spec is resolved (variable substitution) and handed to whichever
//! [`Caller`] the run context holds. The response triple (status, raw
//! body, parsed body) is bound into the invocation's named arguments
//! before the test body executes.

use crate::args::Invocation;
use crate::config::HttpConfig;
use crate::error::{ApiTestError, Result};
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;

/// Declarative HTTP request attached to a test method.
///
/// String values anywhere in the spec may contain `$name` tokens; see
/// [`ApiRequest::resolve`] for the substitution rule.
#[derive(Debug, Clone, Default)]
pub struct ApiRequest {
    /// HTTP method, uppercase.
    pub method: String,
    /// Target URL, possibly containing `$name` tokens.
    pub url: String,
    /// Request headers.
    pub headers: BTreeMap<String, String>,
    /// Request cookies, sent as a `Cookie` header.
    pub cookies: BTreeMap<String, String>,
    /// Form fields, sent urlencoded when no JSON body is set.
    pub form: BTreeMap<String, String>,
    /// JSON body; takes precedence over form fields.
    pub json_body: Option<Value>,
    /// Query parameters.
    pub query: BTreeMap<String, String>,
}

impl ApiRequest {
    /// Starts a request spec with the given method and URL.
    pub fn new(method: &str, url: &str) -> Self {
        Self {
            method: method.to_ascii_uppercase(),
            url: url.to_string(),
            ..Self::default()
        }
    }

    /// GET shorthand.
    pub fn get(url: &str) -> Self {
        Self::new("GET", url)
    }

    /// POST shorthand.
    pub fn post(url: &str) -> Self {
        Self::new("POST", url)
    }

    /// Adds a header.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_string(), value.to_string());
        self
    }

    /// Adds a cookie.
    pub fn cookie(mut self, name: &str, value: &str) -> Self {
        self.cookies.insert(name.to_string(), value.to_string());
        self
    }

    /// Adds a form field.
    pub fn form(mut self, name: &str, value: &str) -> Self {
        self.form.insert(name.to_string(), value.to_string());
        self
    }

    /// Sets the JSON body.
    pub fn json(mut self, body: Value) -> Self {
        self.json_body = Some(body);
        self
    }

    /// Adds a query parameter.
    pub fn query(mut self, name: &str, value: &str) -> Self {
        self.query.insert(name.to_string(), value.to_string());
        self
    }

    /// Resolves every `$name` token in the spec against the invocation.
    ///
    /// A token resolves first against the invocation's named arguments,
    /// then against the variable cache; unresolved tokens are left as-is.
    /// This is the single substitution mechanism for URLs, headers,
    /// cookies, form fields, query parameters, and JSON string values.
    pub fn resolve(&self, inv: &Invocation) -> ApiRequest {
        let mut resolved = self.clone();
        resolved.url = substitute(&self.url, inv);
        for value in resolved.headers.values_mut() {
            *value = substitute(value, inv);
        }
        for value in resolved.cookies.values_mut() {
            *value = substitute(value, inv);
        }
        for value in resolved.form.values_mut() {
            *value = substitute(value, inv);
        }
        for value in resolved.query.values_mut() {
            *value = substitute(value, inv);
        }
        if let Some(body) = resolved.json_body.as_mut() {
            substitute_json(body, inv);
        }
        resolved
    }
}

/// Response triple produced by a [`Caller`].
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body.
    pub body: String,
    /// Parsed JSON body, when the raw body parses.
    pub json: Option<Value>,
}

impl ApiResponse {
    /// Builds a response, parsing the body as JSON when possible.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        let json = serde_json::from_str(&body).ok();
        Self { status, body, json }
    }
}

/// Executes a resolved request, live or simulated.
pub trait Caller: Send + Sync {
    /// Performs the request and returns the response triple.
    fn call(&self, request: &ApiRequest) -> Result<ApiResponse>;
}

/// Caller that returns a fixed response without any network traffic.
#[derive(Debug, Clone)]
pub struct MockCaller {
    status: u16,
    body: String,
    json: Option<Value>,
}

impl MockCaller {
    /// Fixed status and raw body; the JSON view stays unset.
    pub fn new(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            json: None,
        }
    }

    /// Sets the parsed-body view returned alongside the raw body.
    pub fn with_json(mut self, json: Value) -> Self {
        self.json = Some(json);
        self
    }
}

impl Caller for MockCaller {
    fn call(&self, request: &ApiRequest) -> Result<ApiResponse> {
        tracing::debug!(method = %request.method, url = %request.url, "mock call");
        Ok(ApiResponse {
            status: self.status,
            body: self.body.clone(),
            json: self.json.clone(),
        })
    }
}

/// Live HTTP caller backed by a blocking reqwest client.
pub struct HttpCaller {
    client: reqwest::blocking::Client,
    base_url: Option<String>,
}

impl HttpCaller {
    /// Creates a caller with default client settings.
    pub fn new() -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            base_url: None,
        }
    }

    /// Creates a caller from HTTP configuration.
    pub fn from_config(config: &HttpConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    /// Sets a base URL prepended to relative request URLs.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    fn full_url(&self, url: &str) -> String {
        match (&self.base_url, url.starts_with("http")) {
            (Some(base), false) => {
                format!("{}/{}", base.trim_end_matches('/'), url.trim_start_matches('/'))
            }
            _ => url.to_string(),
        }
    }
}

impl Default for HttpCaller {
    fn default() -> Self {
        Self::new()
    }
}

impl Caller for HttpCaller {
    fn call(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let method = reqwest::Method::from_bytes(request.method.as_bytes())
            .map_err(|_| ApiTestError::InvalidRequest(format!("bad method: {}", request.method)))?;
        let url = self.full_url(&request.url);

        tracing::info!(method = %request.method, url = %url, "http call");

        let mut builder = self.client.request(method, &url);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if !request.cookies.is_empty() {
            let cookie_header = request
                .cookies
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect::<Vec<_>>()
                .join("; ");
            builder = builder.header("Cookie", cookie_header);
        }
        if !request.query.is_empty() {
            builder = builder.query(&request.query.iter().collect::<Vec<_>>());
        }
        if let Some(body) = &request.json_body {
            builder = builder.json(body);
        } else if !request.form.is_empty() {
            builder = builder.form(&request.form.iter().collect::<Vec<_>>());
        }

        let response = builder.send()?;
        let status = response.status().as_u16();
        let body = response.text()?;
        Ok(ApiResponse::new(status, body))
    }
}

/// Replaces `$name` tokens in `template`.
///
/// A token is `$` followed by an identifier. Resolution order: named
/// invocation arguments, then the variable cache. Unresolved tokens are
/// left untouched.
fn substitute(template: &str, inv: &Invocation) -> String {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }

        let mut name = String::new();
        while let Some(&next) = chars.peek() {
            if next.is_ascii_alphanumeric() || next == '_' {
                name.push(next);
                chars.next();
            } else {
                break;
            }
        }

        if name.is_empty() {
            out.push('$');
            continue;
        }

        match lookup_var(&name, inv) {
            Some(value) => out.push_str(&render(&value)),
            None => {
                out.push('$');
                out.push_str(&name);
            }
        }
    }

    out
}

/// Recursively substitutes tokens in JSON string values.
fn substitute_json(value: &mut Value, inv: &Invocation) {
    match value {
        Value::String(s) => *s = substitute(s, inv),
        Value::Array(items) => {
            for item in items {
                substitute_json(item, inv);
            }
        }
        Value::Object(map) => {
            for item in map.values_mut() {
                substitute_json(item, inv);
            }
        }
        _ => {}
    }
}

fn lookup_var(name: &str, inv: &Invocation) -> Option<Value> {
    inv.args.get(name).cloned().or_else(|| inv.vars.get(name))
}

/// String form of a variable for insertion into the request text.
fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
