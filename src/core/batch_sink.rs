//! Batch sink trait for remote log delivery

use super::{config::Environment, error::Result, log_entry::LogEntry};
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Wire payload for one remote delivery
///
/// ```json
/// { "logs": [...], "environment": "testnet", "timestamp": "2025-01-08T10:30:45.120Z" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogBatch {
    pub logs: Vec<LogEntry>,
    pub environment: Environment,
    /// Send time, as opposed to each entry's creation time
    pub timestamp: String,
}

impl LogBatch {
    pub fn new(logs: Vec<LogEntry>, environment: Environment) -> Self {
        Self {
            logs,
            environment,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    pub fn len(&self) -> usize {
        self.logs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.logs.is_empty()
    }

    pub fn into_entries(self) -> Vec<LogEntry> {
        self.logs
    }
}

/// Trait for asynchronous delivery of buffered entries to a collector
///
/// The endpoint is passed per call because it belongs to the live logger
/// configuration and may change between flushes.
///
/// # Example
///
/// ```no_run
/// use bridge_resilience::core::{BatchSink, LogBatch, Result};
/// use async_trait::async_trait;
///
/// struct StdoutSink;
///
/// #[async_trait]
/// impl BatchSink for StdoutSink {
///     async fn deliver(&self, _endpoint: &str, batch: &LogBatch) -> Result<()> {
///         println!("{}", serde_json::to_string(batch)?);
///         Ok(())
///     }
///
///     fn name(&self) -> &str {
///         "stdout"
///     }
/// }
/// ```
#[async_trait]
pub trait BatchSink: Send + Sync {
    /// Deliver the whole batch as a single request
    async fn deliver(&self, endpoint: &str, batch: &LogBatch) -> Result<()>;

    /// Get the sink name
    fn name(&self) -> &str;
}
