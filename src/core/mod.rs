//! Core logger types and traits

pub mod appender;
pub mod batch_sink;
pub mod config;
pub mod error;
pub mod log_category;
pub mod log_context;
pub mod log_entry;
pub mod log_level;
pub mod logger;
pub mod metrics;

pub use appender::Appender;
pub use batch_sink::{BatchSink, LogBatch};
pub use config::{Environment, LoggerConfig, LoggerConfigUpdate};
pub use error::{LoggerError, Result};
pub use log_category::LogCategory;
pub use log_context::{FieldValue, LogContext};
pub use log_entry::{ErrorInfo, LogEntry};
pub use log_level::LogLevel;
pub use logger::{Logger, LoggerBuilder, LoggerState, DEFAULT_SHUTDOWN_TIMEOUT};
pub use metrics::LoggerMetrics;
