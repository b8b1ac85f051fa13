//! Configuration types for apitest runs.

use crate::error::{ApiTestError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Comprehensive configuration for an apitest run.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// HTTP transport configuration.
    #[serde(default)]
    pub http: HttpConfig,

    /// Execution configuration.
    #[serde(default)]
    pub run: RunConfig,

    /// Report rendering configuration.
    #[serde(default)]
    pub report: ReportConfig,
}

impl Config {
    /// Load configuration from `apitest.toml` under `root`.
    ///
    /// A missing file yields the defaults.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join("apitest.toml");
        if path.exists() {
            let content = fs::read_to_string(&path)
                .map_err(|e| ApiTestError::Config(format!("failed to read config: {}", e)))?;
            toml::from_str(&content)
                .map_err(|e| ApiTestError::Config(format!("failed to parse config: {}", e)))
        } else {
            Ok(Config::default())
        }
    }

    /// Save configuration to `apitest.toml` under `root`.
    pub fn save(&self, root: &Path) -> Result<()> {
        let path = root.join("apitest.toml");
        let content = toml::to_string_pretty(self)
            .map_err(|e| ApiTestError::Config(format!("failed to serialize config: {}", e)))?;
        fs::write(&path, content)
            .map_err(|e| ApiTestError::Config(format!("failed to write config: {}", e)))?;
        Ok(())
    }
}

/// HTTP transport configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Base URL prepended to relative request URLs.
    pub base_url: Option<String>,

    /// Per-request transport timeout in seconds (default: 30).
    ///
    /// This bounds a single HTTP round trip; the per-test budget from
    /// a timeout modifier is enforced separately.
    pub request_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            request_timeout_secs: 30,
        }
    }
}

/// Execution configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Default per-test time budget in seconds, applied when a test has
    /// no timeout modifier of its own. `None` means unbounded.
    pub default_timeout_secs: Option<u64>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            default_timeout_secs: None,
        }
    }
}

impl RunConfig {
    /// Returns the default budget as a Duration, when configured.
    pub fn default_timeout(&self) -> Option<Duration> {
        self.default_timeout_secs.map(Duration::from_secs)
    }
}

/// Report rendering configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Emit colors in the plain-text report (default: true).
    pub color: bool,

    /// Print each failed test's message under the summary (default: true).
    pub show_failures: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            color: true,
            show_failures: true,
        }
    }
}
