//! Match configuration

use crate::result::{HarnessError, HarnessResult};
use crate::wait::{DEFAULT_ITEM_WAIT_MS, DEFAULT_MATCH_TIMEOUT_MS, DEFAULT_SETTLE_MS};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable overriding [`MatchOptions::timeout_ms`]
pub const ENV_TIMEOUT_MS: &str = "MENU_HARNESS_TIMEOUT_MS";

/// Environment variable overriding [`MatchOptions::item_wait_ms`]
pub const ENV_ITEM_WAIT_MS: &str = "MENU_HARNESS_ITEM_WAIT_MS";

/// Environment variable overriding [`MatchOptions::settle_ms`]
pub const ENV_SETTLE_MS: &str = "MENU_HARNESS_SETTLE_MS";

/// Timing options for a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MatchOptions {
    /// Deadline of a fresh root result, in milliseconds
    pub timeout_ms: u64,
    /// Maximum wait for a menu change between polling attempts
    pub item_wait_ms: u64,
    /// Wait after a side effect the provider did not acknowledge
    pub settle_ms: u64,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_MATCH_TIMEOUT_MS,
            item_wait_ms: DEFAULT_ITEM_WAIT_MS,
            settle_ms: DEFAULT_SETTLE_MS,
        }
    }
}

impl MatchOptions {
    /// Create options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the match deadline in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set the maximum wait between polling attempts
    #[must_use]
    pub const fn with_item_wait(mut self, item_wait_ms: u64) -> Self {
        self.item_wait_ms = item_wait_ms;
        self
    }

    /// Set the side-effect propagation wait
    #[must_use]
    pub const fn with_settle(mut self, settle_ms: u64) -> Self {
        self.settle_ms = settle_ms;
        self
    }

    /// Deadline as Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Item wait as Duration
    #[must_use]
    pub const fn item_wait(&self) -> Duration {
        Duration::from_millis(self.item_wait_ms)
    }

    /// Settle wait as Duration
    #[must_use]
    pub const fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    /// Parse options from YAML; missing fields keep their defaults
    pub fn from_yaml(yaml: &str) -> HarnessResult<Self> {
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    /// Load options from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> HarnessResult<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml(&yaml)
    }

    /// Apply overrides from `MENU_HARNESS_*` environment variables
    pub fn with_env_overrides(self) -> HarnessResult<Self> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides looked up through `lookup`
    pub fn with_overrides_from<F>(mut self, lookup: F) -> HarnessResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let parse = |key: &str| -> HarnessResult<Option<u64>> {
            lookup(key)
                .map(|raw| {
                    raw.trim().parse::<u64>().map_err(|_| {
                        HarnessError::config(format!(
                            "{key} must be a whole number of milliseconds, got '{raw}'"
                        ))
                    })
                })
                .transpose()
        };

        if let Some(ms) = parse(ENV_TIMEOUT_MS)? {
            self.timeout_ms = ms;
        }
        if let Some(ms) = parse(ENV_ITEM_WAIT_MS)? {
            self.item_wait_ms = ms;
        }
        if let Some(ms) = parse(ENV_SETTLE_MS)? {
            self.settle_ms = ms;
        }
        Ok(self)
    }

    /// Render as YAML
    pub fn to_yaml(&self) -> HarnessResult<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }
}
