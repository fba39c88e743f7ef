//! Request lifecycle hooks
//!
//! Each client owns its own ordered chain; nothing is patched globally.

use super::error::RequestError;
use super::request_client::Response;
use super::transport::{OutboundRequest, Request};
use crate::core::{LogCategory, Logger};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

/// Observer of a request's lifecycle
///
/// All hooks default to no-ops. `on_request` may rewrite the request before
/// its URL is resolved.
pub trait Interceptor: Send + Sync {
    fn on_request(&self, _request: &mut Request) {}

    /// Called before sleeping ahead of attempt `attempt + 1`
    fn on_retry(
        &self,
        _request: &OutboundRequest,
        _attempt: u32,
        _error: &RequestError,
        _delay: Duration,
    ) {
    }

    fn on_response(&self, _request: &OutboundRequest, _response: &Response) {}

    /// Called once after the error handler saw a terminal failure
    fn on_failure(&self, _request: &OutboundRequest, _error: &RequestError, _attempts: u32) {}
}

/// Writes Network-category trace entries for every outcome
pub struct NetworkLogInterceptor {
    logger: Arc<Logger>,
}

impl NetworkLogInterceptor {
    pub fn new(logger: Arc<Logger>) -> Self {
        Self { logger }
    }
}

impl Interceptor for NetworkLogInterceptor {
    fn on_request(&self, request: &mut Request) {
        self.logger.debug(
            LogCategory::Network,
            "Request",
            Some(json!({
                "method": request.method.as_str(),
                "path": request.path,
            })),
        );
    }

    fn on_retry(
        &self,
        request: &OutboundRequest,
        attempt: u32,
        error: &RequestError,
        delay: Duration,
    ) {
        self.logger.warn(
            LogCategory::Network,
            format!("Retrying request (retry {})", attempt + 1),
            Some(json!({
                "method": request.method.as_str(),
                "url": request.url,
                "attempt": attempt + 1,
                "delayMs": u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                "error": error.to_string(),
            })),
        );
    }

    fn on_response(&self, request: &OutboundRequest, response: &Response) {
        self.logger.info(
            LogCategory::Network,
            "Response",
            Some(json!({
                "method": request.method.as_str(),
                "url": request.url,
                "status": response.status,
                "attempts": response.attempts,
            })),
        );
    }

    /// Debug trace only: the error handler owns the Error-level entry
    fn on_failure(&self, request: &OutboundRequest, error: &RequestError, attempts: u32) {
        self.logger.debug(
            LogCategory::Network,
            "Request abandoned",
            Some(json!({
                "method": request.method.as_str(),
                "url": request.url,
                "status": error.status(),
                "attempts": attempts,
                "error": error.to_string(),
            })),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{BatchSink, LogBatch, LogLevel};
    use async_trait::async_trait;
    use reqwest::Method;
    use serde_json::Value;

    struct DiscardSink;

    #[async_trait]
    impl BatchSink for DiscardSink {
        async fn deliver(&self, _endpoint: &str, _batch: &LogBatch) -> crate::core::Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "discard"
        }
    }

    fn buffering_logger() -> Arc<Logger> {
        Arc::new(
            Logger::builder()
                .min_level(LogLevel::Debug)
                .enable_console(false)
                .remote_endpoint("http://collector.test/logs")
                .max_buffer_size(100)
                .flush_interval(Duration::ZERO)
                .sink(Arc::new(DiscardSink))
                .build()
                .unwrap(),
        )
    }

    fn outbound() -> OutboundRequest {
        OutboundRequest {
            method: Method::POST,
            url: "https://api.test/v1/bridge/config".to_string(),
            headers: Vec::new(),
            body: None,
            timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn test_network_entries_per_hook() {
        let logger = buffering_logger();
        let interceptor = NetworkLogInterceptor::new(Arc::clone(&logger));
        let request = outbound();
        let error = RequestError::http(503, b"busy");

        interceptor.on_request(&mut Request::post("/bridge/config"));
        interceptor.on_retry(&request, 1, &error, Duration::from_secs(2));
        interceptor.on_response(
            &request,
            &Response {
                status: 200,
                body: Value::Null,
                attempts: 3,
            },
        );
        interceptor.on_failure(&request, &error, 4);

        let entries: Vec<_> = logger
            .buffered_entries()
            .into_iter()
            .filter(|e| e.category == LogCategory::Network)
            .collect();
        let tags: Vec<_> = entries.iter().map(|e| (e.level, e.title.as_str())).collect();
        assert_eq!(
            tags,
            [
                (LogLevel::Debug, "Request"),
                (LogLevel::Warn, "Retrying request (retry 2)"),
                (LogLevel::Info, "Response"),
                (LogLevel::Debug, "Request abandoned"),
            ]
        );

        let retry = entries[1].data.as_ref().unwrap();
        assert_eq!(retry["attempt"], 2);
        assert_eq!(retry["delayMs"], 2000);
        let failure = entries[3].data.as_ref().unwrap();
        assert_eq!(failure["attempts"], 4);
        assert_eq!(failure["status"], 503);
    }

    #[test]
    fn test_failure_trace_is_never_error_level() {
        let logger = buffering_logger();
        let interceptor = NetworkLogInterceptor::new(Arc::clone(&logger));

        interceptor.on_failure(&outbound(), &RequestError::transport("refused"), 4);

        assert!(logger
            .buffered_entries()
            .iter()
            .all(|e| e.level < LogLevel::Error));
    }
}
