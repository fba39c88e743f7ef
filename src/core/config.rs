//! Logger configuration
//!
//! Defaults come from the deployment environment and are read once when the
//! logger is built. The live configuration can then be replaced field by
//! field through [`LoggerConfigUpdate`].

use super::error::{LoggerError, Result};
use super::log_level::LogLevel;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Selects `Development` when set to `development`
pub const APP_ENV_VAR: &str = "APP_ENV";
/// Selects `Testnet` when set to `testnet`
pub const BRIDGE_ENV_VAR: &str = "BRIDGE_ENV";
/// Remote collector address
pub const LOG_ENDPOINT_VAR: &str = "LOG_ENDPOINT";
/// Optional override of the environment's default minimum level
pub const LOG_LEVEL_VAR: &str = "LOG_LEVEL";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Testnet,
    #[default]
    Production,
}

impl Environment {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve the environment through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if lookup(APP_ENV_VAR).as_deref() == Some("development") {
            Environment::Development
        } else if lookup(BRIDGE_ENV_VAR).as_deref() == Some("testnet") {
            Environment::Testnet
        } else {
            Environment::Production
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Testnet => "testnet",
            Environment::Production => "production",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoggerConfig {
    /// Minimum severity that is emitted
    pub level: LogLevel,
    pub enable_console: bool,
    pub enable_remote: bool,
    pub remote_endpoint: Option<String>,
    /// Buffer length that forces a flush; must be > 0
    pub max_buffer_size: usize,
    /// Timer period; zero disables the timer
    pub flush_interval: Duration,
    /// Most entries held while the collector keeps rejecting batches;
    /// the oldest are dropped beyond it. Never below `max_buffer_size`.
    pub max_backlog: usize,
}

impl LoggerConfig {
    /// Defaults for a given environment, without an endpoint
    pub fn for_environment(environment: Environment) -> Self {
        match environment {
            Environment::Development => Self {
                level: LogLevel::Debug,
                enable_console: true,
                enable_remote: false,
                remote_endpoint: None,
                max_buffer_size: 100,
                flush_interval: Duration::from_secs(5),
                max_backlog: 1_000,
            },
            Environment::Testnet => Self {
                level: LogLevel::Info,
                enable_console: true,
                enable_remote: true,
                remote_endpoint: None,
                max_buffer_size: 50,
                flush_interval: Duration::from_secs(10),
                max_backlog: 500,
            },
            Environment::Production => Self {
                level: LogLevel::Warn,
                enable_console: false,
                enable_remote: true,
                remote_endpoint: None,
                max_buffer_size: 100,
                flush_interval: Duration::from_secs(30),
                max_backlog: 1_000,
            },
        }
    }

    pub fn from_env() -> (Environment, Self) {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the environment defaults through an arbitrary variable lookup
    ///
    /// An unparsable `LOG_LEVEL` is reported on stderr and ignored.
    pub fn from_lookup<F>(lookup: F) -> (Environment, Self)
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = Environment::from_lookup(&lookup);
        let mut config = Self::for_environment(environment);

        if config.enable_remote {
            config.remote_endpoint = lookup(LOG_ENDPOINT_VAR).filter(|s| !s.trim().is_empty());
        }

        if let Some(raw) = lookup(LOG_LEVEL_VAR) {
            match raw.parse::<LogLevel>() {
                Ok(level) => config.level = level,
                Err(e) => eprintln!("[LOGGER WARNING] Ignoring {}: {}", LOG_LEVEL_VAR, e),
            }
        }

        (environment, config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_buffer_size == 0 {
            return Err(LoggerError::config(
                "LoggerConfig",
                "max_buffer_size must be greater than zero",
            ));
        }
        if self.max_backlog == 0 {
            return Err(LoggerError::config(
                "LoggerConfig",
                "max_backlog must be greater than zero",
            ));
        }
        if let Some(endpoint) = &self.remote_endpoint {
            if reqwest::Url::parse(endpoint).is_err() {
                return Err(LoggerError::config(
                    "LoggerConfig",
                    format!("remote_endpoint '{}' is not a valid URL", endpoint),
                ));
            }
        }
        Ok(())
    }

    /// Backlog limit actually enforced
    pub fn backlog_cap(&self) -> usize {
        self.max_backlog.max(self.max_buffer_size)
    }

    /// Whether the recurring flush timer should be running
    pub fn timer_enabled(&self) -> bool {
        self.enable_remote && !self.flush_interval.is_zero()
    }

    /// Return a copy with `update` applied, validated
    pub fn merged(&self, update: &LoggerConfigUpdate) -> Result<Self> {
        let mut next = self.clone();
        if let Some(level) = update.level {
            next.level = level;
        }
        if let Some(enable_console) = update.enable_console {
            next.enable_console = enable_console;
        }
        if let Some(enable_remote) = update.enable_remote {
            next.enable_remote = enable_remote;
        }
        if let Some(endpoint) = &update.remote_endpoint {
            next.remote_endpoint = endpoint.clone();
        }
        if let Some(max_buffer_size) = update.max_buffer_size {
            next.max_buffer_size = max_buffer_size;
        }
        if let Some(flush_interval) = update.flush_interval {
            next.flush_interval = flush_interval;
        }
        if let Some(max_backlog) = update.max_backlog {
            next.max_backlog = max_backlog;
        }
        next.validate()?;
        Ok(next)
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self::for_environment(Environment::Development)
    }
}

/// Partial configuration change; `None` leaves a field untouched
///
/// `remote_endpoint: Some(None)` clears the endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoggerConfigUpdate {
    pub level: Option<LogLevel>,
    pub enable_console: Option<bool>,
    pub enable_remote: Option<bool>,
    pub remote_endpoint: Option<Option<String>>,
    pub max_buffer_size: Option<usize>,
    pub flush_interval: Option<Duration>,
    pub max_backlog: Option<usize>,
}

impl LoggerConfigUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn level(mut self, level: LogLevel) -> Self {
        self.level = Some(level);
        self
    }

    #[must_use]
    pub fn enable_console(mut self, enable: bool) -> Self {
        self.enable_console = Some(enable);
        self
    }

    #[must_use]
    pub fn enable_remote(mut self, enable: bool) -> Self {
        self.enable_remote = Some(enable);
        self
    }

    #[must_use]
    pub fn remote_endpoint(mut self, endpoint: Option<String>) -> Self {
        self.remote_endpoint = Some(endpoint);
        self
    }

    #[must_use]
    pub fn max_buffer_size(mut self, size: usize) -> Self {
        self.max_buffer_size = Some(size);
        self
    }

    #[must_use]
    pub fn flush_interval(mut self, interval: Duration) -> Self {
        self.flush_interval = Some(interval);
        self
    }

    #[must_use]
    pub fn max_backlog(mut self, size: usize) -> Self {
        self.max_backlog = Some(size);
        self
    }

    /// Whether applying this update can change the flush schedule
    pub fn touches_schedule(&self) -> bool {
        self.enable_remote.is_some() || self.flush_interval.is_some()
    }
}

impl From<LoggerConfig> for LoggerConfigUpdate {
    fn from(config: LoggerConfig) -> Self {
        Self {
            level: Some(config.level),
            enable_console: Some(config.enable_console),
            enable_remote: Some(config.enable_remote),
            remote_endpoint: Some(config.remote_endpoint),
            max_buffer_size: Some(config.max_buffer_size),
            flush_interval: Some(config.flush_interval),
            max_backlog: Some(config.max_backlog),
        }
    }
}
