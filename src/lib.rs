//! # Bridge Resilience
//!
//! Client-side resilience for a token-bridge front end: an HTTP request
//! client that retries transient failures and translates application error
//! codes, plus a batching structured logger that ships entries to a remote
//! collector.
//!
//! ## Features
//!
//! - **Retry with backoff**: `base_delay * 2^attempt`, transient failures only
//! - **Business errors**: HTTP 200 with a non-zero `code` is a failure, never retried
//! - **Batched remote logging**: size- and timer-triggered flushes on a worker thread
//! - **Lossless delivery**: rejected batches go back to the front of the buffer
//!
//! ## Example
//!
//! ```no_run
//! use bridge_resilience::prelude::*;
//! use std::sync::Arc;
//!
//! # async fn run() -> std::result::Result<(), Box<dyn std::error::Error>> {
//! let logger = Logger::global();
//! let api = BridgeApi::with_logger(Arc::clone(&logger))?;
//!
//! let config = api.get_bridge_config("bridge.example.com").await?;
//! logger.info(LogCategory::Bridge, "Bridge config loaded", config.data);
//! # Ok(())
//! # }
//! ```

pub mod appenders;
pub mod bridge_api;
pub mod client;
pub mod core;
pub mod error_handler;
pub mod macros;

pub mod prelude {
    pub use crate::appenders::{ConsoleAppender, HttpBatchSink};
    pub use crate::bridge_api::{ApiResponseData, BridgeApi, GetBridgeConfigParams};
    pub use crate::client::{
        ClientBuilder, Interceptor, NetworkLogInterceptor, Request, RequestClient, RequestError,
        Response, RetryPolicy, RetryPredicate,
    };
    pub use crate::core::{
        Appender, BatchSink, Environment, ErrorInfo, FieldValue, LogBatch, LogCategory,
        LogContext, LogEntry, LogLevel, Logger, LoggerBuilder, LoggerConfig, LoggerConfigUpdate,
        LoggerError, LoggerMetrics, LoggerState, Result,
    };
    pub use crate::error_handler::{ErrorCode, ErrorHandler, LoggingErrorHandler};
}

pub use appenders::{ConsoleAppender, HttpBatchSink};
pub use bridge_api::{ApiResponseData, BridgeApi, GetBridgeConfigParams};
pub use client::{ClientBuilder, RequestClient, RequestError, Response, RetryPolicy};
pub use crate::core::logger::{log, log_error, log_net, log_tx};
pub use crate::core::{
    Appender, BatchSink, Environment, ErrorInfo, FieldValue, LogBatch, LogCategory, LogContext,
    LogEntry, LogLevel, Logger, LoggerBuilder, LoggerConfig, LoggerConfigUpdate, LoggerError,
    LoggerMetrics, LoggerState, Result, DEFAULT_SHUTDOWN_TIMEOUT,
};
pub use error_handler::{map_business_error_code, ErrorCode, ErrorHandler, LoggingErrorHandler};
