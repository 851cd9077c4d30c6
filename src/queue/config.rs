//! Configuration for [`MicrotaskQueue`](super::MicrotaskQueue).
//!
//! # Configuration Precedence
//!
//! Settings are resolved in this order (highest priority first):
//!
//! 1. **Programmatic**: builder methods on [`QueueConfig`]
//! 2. **Environment variables**: `PLEDGE_*` variables
//! 3. **Config file**: a TOML file (requires the `config-file` feature)
//! 4. **Defaults**: [`QueueConfig::default()`]
//!
//! # Supported Environment Variables
//!
//! | Variable | Type | Maps to |
//! |----------|------|---------|
//! | `PLEDGE_MAX_JOBS_PER_DRAIN` | `u64` (`0` = unlimited) | `max_jobs_per_drain` |
//! | `PLEDGE_PANIC_POLICY` | `isolate` \| `propagate` | `panic_policy` |
//!
//! # TOML layout
//!
//! ```toml
//! [queue]
//! max_jobs_per_drain = 10000
//! panic_policy = "isolate"
//! ```

use core::fmt;
use core::str::FromStr;

/// Environment variable name for the per-drain job budget.
pub const ENV_MAX_JOBS_PER_DRAIN: &str = "PLEDGE_MAX_JOBS_PER_DRAIN";
/// Environment variable name for the job panic policy.
pub const ENV_PANIC_POLICY: &str = "PLEDGE_PANIC_POLICY";

/// Default per-drain job budget.
pub const DEFAULT_MAX_JOBS_PER_DRAIN: u64 = 1_000_000;

/// Errors raised while loading queue configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A variable was set to a value of the wrong type.
    #[error("invalid value for {var}: expected {expected}, got {value:?}")]
    InvalidValue {
        /// Variable or key name.
        var: &'static str,
        /// Human-readable expected type.
        expected: &'static str,
        /// The raw value.
        value: String,
    },
    /// Unknown panic policy name.
    #[error("unknown panic policy {0:?}: expected `isolate` or `propagate`")]
    InvalidPanicPolicy(String),
    /// The config file could not be read or parsed.
    #[error("config file {path}: {message}")]
    File {
        /// Path of the file.
        path: String,
        /// What went wrong.
        message: String,
    },
}

/// What the queue does when a job panics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanicPolicy {
    /// Catch the panic at the job boundary, record it, keep draining.
    #[default]
    Isolate,
    /// Log the panic and resume unwinding out of the drain call.
    Propagate,
}

impl FromStr for PanicPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "isolate" => Ok(Self::Isolate),
            "propagate" => Ok(Self::Propagate),
            _ => Err(ConfigError::InvalidPanicPolicy(s.to_string())),
        }
    }
}

impl fmt::Display for PanicPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Isolate => f.write_str("isolate"),
            Self::Propagate => f.write_str("propagate"),
        }
    }
}

/// Microtask queue configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueConfig {
    /// Maximum jobs a single `run_until_idle` may run (`None` = unlimited).
    ///
    /// A continuation that keeps scheduling new continuations never lets the
    /// queue go idle; the budget turns that into an error instead of a hang.
    pub max_jobs_per_drain: Option<u64>,
    /// Panic handling at the job boundary.
    pub panic_policy: PanicPolicy,
}

impl QueueConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_jobs_per_drain: Some(DEFAULT_MAX_JOBS_PER_DRAIN),
            panic_policy: PanicPolicy::Isolate,
        }
    }

    /// Sets the per-drain job budget.
    #[must_use]
    pub const fn max_jobs_per_drain(mut self, max: Option<u64>) -> Self {
        self.max_jobs_per_drain = max;
        self
    }

    /// Sets the panic policy.
    #[must_use]
    pub const fn panic_policy(mut self, policy: PanicPolicy) -> Self {
        self.panic_policy = policy;
        self
    }

    /// Normalize configuration values.
    ///
    /// A budget of zero means unlimited.
    pub fn normalize(&mut self) {
        if self.max_jobs_per_drain == Some(0) {
            self.max_jobs_per_drain = None;
        }
    }

    /// Defaults overlaid with `PLEDGE_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::new();
        apply_env_overrides(&mut config)?;
        config.normalize();
        Ok(config)
    }

    /// Defaults overlaid with a TOML file, then with environment variables.
    #[cfg(feature = "config-file")]
    pub fn from_file_and_env(path: &std::path::Path) -> Result<Self, ConfigError> {
        let mut config = Self::new();
        apply_toml_config(&mut config, &parse_toml_file(path)?);
        apply_env_overrides(&mut config)?;
        config.normalize();
        Ok(config)
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Apply environment variable overrides to a [`QueueConfig`].
///
/// Only variables that are set in the environment are applied.
pub fn apply_env_overrides(config: &mut QueueConfig) -> Result<(), ConfigError> {
    apply_overrides_with(config, read_env)
}

fn apply_overrides_with<F>(config: &mut QueueConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(val) = lookup(ENV_MAX_JOBS_PER_DRAIN) {
        config.max_jobs_per_drain = Some(parse_u64(ENV_MAX_JOBS_PER_DRAIN, &val)?);
    }
    if let Some(val) = lookup(ENV_PANIC_POLICY) {
        config.panic_policy = val.parse()?;
    }
    Ok(())
}

fn read_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn parse_u64(var: &'static str, val: &str) -> Result<u64, ConfigError> {
    val.trim()
        .parse::<u64>()
        .map_err(|_| ConfigError::InvalidValue {
            var,
            expected: "unsigned integer",
            value: val.to_string(),
        })
}

// =========================================================================
// TOML config file support (feature-gated)
// =========================================================================

/// TOML-deserializable queue configuration.
#[cfg(feature = "config-file")]
#[derive(serde::Deserialize, Default, Debug)]
pub struct QueueTomlConfig {
    /// Queue settings.
    #[serde(default)]
    pub queue: QueueToml,
}

/// `[queue]` section of the TOML config.
#[cfg(feature = "config-file")]
#[derive(serde::Deserialize, Default, Debug)]
pub struct QueueToml {
    /// Per-drain job budget (`0` = unlimited).
    pub max_jobs_per_drain: Option<u64>,
    /// Panic policy.
    pub panic_policy: Option<PanicPolicy>,
}

/// Apply a parsed TOML config. Only fields present in the file override.
#[cfg(feature = "config-file")]
pub fn apply_toml_config(config: &mut QueueConfig, toml: &QueueTomlConfig) {
    if let Some(v) = toml.queue.max_jobs_per_drain {
        config.max_jobs_per_drain = Some(v);
    }
    if let Some(v) = toml.queue.panic_policy {
        config.panic_policy = v;
    }
}

/// Parse a TOML string into a [`QueueTomlConfig`].
#[cfg(feature = "config-file")]
pub fn parse_toml_str(toml_str: &str) -> Result<QueueTomlConfig, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::File {
        path: "<string>".to_string(),
        message: e.to_string(),
    })
}

/// Read and parse a TOML file into a [`QueueTomlConfig`].
#[cfg(feature = "config-file")]
pub fn parse_toml_file(path: &std::path::Path) -> Result<QueueTomlConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::File {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    toml::from_str(&content).map_err(|e| ConfigError::File {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}
