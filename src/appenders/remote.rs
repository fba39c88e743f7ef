//! HTTP sink for remote logging
//!
//! Posts each flushed batch as one JSON document to the collector endpoint.

use crate::core::{BatchSink, LogBatch, LoggerError, Result};
use async_trait::async_trait;
use flate2::write::GzEncoder;
use flate2::Compression;
use reqwest::header::{CONTENT_ENCODING, CONTENT_TYPE};
use reqwest::Client;
use std::io::Write;
use std::time::Duration;

/// Default request timeout for a single delivery
pub const DEFAULT_DELIVERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Batch sink that POSTs `LogBatch` payloads over HTTP
///
/// # Example
///
/// ```no_run
/// use bridge_resilience::appenders::HttpBatchSink;
/// use bridge_resilience::prelude::*;
/// use std::sync::Arc;
///
/// let sink = HttpBatchSink::new().expect("Failed to build HTTP client");
///
/// let logger = Logger::builder()
///     .remote_endpoint("https://logs.example.com/ingest")
///     .sink(Arc::new(sink))
///     .build()
///     .expect("valid configuration");
/// logger.warn(LogCategory::Bridge, "Quote expired", None);
/// ```
pub struct HttpBatchSink {
    client: Client,
    compress: bool,
}

impl HttpBatchSink {
    /// Create a sink with the default delivery timeout
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be constructed
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_DELIVERY_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LoggerError::config("HttpBatchSink", e.to_string()))?;

        Ok(Self {
            client,
            compress: false,
        })
    }

    /// Gzip request bodies and mark them with `Content-Encoding: gzip`
    ///
    /// Default: disabled
    #[must_use]
    pub fn with_compression(mut self, enable: bool) -> Self {
        self.compress = enable;
        self
    }

    fn encode(&self, batch: &LogBatch) -> Result<Vec<u8>> {
        let json = serde_json::to_vec(batch)?;
        if !self.compress {
            return Ok(json);
        }

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&json)?;
        Ok(encoder.finish()?)
    }
}

#[async_trait]
impl BatchSink for HttpBatchSink {
    async fn deliver(&self, endpoint: &str, batch: &LogBatch) -> Result<()> {
        let body = self.encode(batch)?;

        let mut request = self
            .client
            .post(endpoint)
            .header(CONTENT_TYPE, "application/json");
        if self.compress {
            request = request.header(CONTENT_ENCODING, "gzip");
        }

        let response = request
            .body(body)
            .send()
            .await
            .map_err(|e| LoggerError::delivery(endpoint, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoggerError::delivery(
                endpoint,
                format!("collector returned HTTP {}", status.as_u16()),
            ));
        }

        Ok(())
    }

    fn name(&self) -> &str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Environment, LogCategory, LogEntry, LogLevel};
    use flate2::read::GzDecoder;
    use std::io::Read;

    fn batch() -> LogBatch {
        LogBatch::new(
            vec![LogEntry::new(LogLevel::Warn, LogCategory::Network, "RPC slow")],
            Environment::Production,
        )
    }

    #[test]
    fn test_plain_encoding_is_json() {
        let sink = HttpBatchSink::new().unwrap();
        let body = sink.encode(&batch()).unwrap();
        let decoded: LogBatch = serde_json::from_slice(&body).unwrap();
        assert_eq!(decoded.logs[0].title, "RPC slow");
    }

    #[test]
    fn test_compressed_encoding_inflates_to_json() {
        let sink = HttpBatchSink::new().unwrap().with_compression(true);
        let body = sink.encode(&batch()).unwrap();

        let mut json = String::new();
        GzDecoder::new(body.as_slice()).read_to_string(&mut json).unwrap();
        assert!(json.contains("\"environment\":\"production\""));
    }

    #[test]
    fn test_delivery_to_closed_port_fails() {
        let sink = HttpBatchSink::with_timeout(Duration::from_millis(500)).unwrap();

        // Nothing listens on port 9 locally, the connection is refused
        let result = tokio_test::block_on(sink.deliver("http://127.0.0.1:9/logs", &batch()));
        assert!(matches!(result, Err(LoggerError::DeliveryFailed { .. })));
    }
}
