//! Resilient request client
//!
//! One `send` runs the interceptor chain, executes the request through the
//! transport, classifies the response, and retries transient failures with
//! exponential backoff. A failure that ends the loop is reported to the
//! error handler exactly once before being returned.

use super::classifier::{BusinessCodeClassifier, ResponseClassifier};
use super::error::RequestError;
use super::interceptor::{Interceptor, NetworkLogInterceptor};
use super::retry::RetryPolicy;
use super::transport::{OutboundRequest, ReqwestTransport, Request, Transport};
use crate::core::Logger;
use crate::error_handler::{ErrorHandler, LoggingErrorHandler};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Environment variable overriding the API base URL
pub const ENV_BASE_URL: &str = "BRIDGE_API_BASE_URL";

pub const DEFAULT_BASE_URL: &str = "https://bridgex-api.orbiter.finance/api/v1";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for the bridge configuration endpoint
pub const BRIDGE_CONFIG_TIMEOUT: Duration = Duration::from_secs(5);

/// Base URL from the process environment
pub fn base_url_from_env() -> String {
    base_url_from_lookup(|key| std::env::var(key).ok())
}

/// Base URL from an arbitrary variable source
///
/// Unset or blank values fall back to [`DEFAULT_BASE_URL`].
pub fn base_url_from_lookup<F>(lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(ENV_BASE_URL)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
}

/// Successful outcome of a request
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub body: Value,
    /// Attempts made, including the successful one
    pub attempts: u32,
}

#[derive(Clone)]
pub struct RequestClient {
    base_url: String,
    timeout: Duration,
    retry: RetryPolicy,
    classifier: Arc<dyn ResponseClassifier>,
    transport: Arc<dyn Transport>,
    error_handler: Arc<dyn ErrorHandler>,
    interceptors: Vec<Arc<dyn Interceptor>>,
}

impl RequestClient {
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// General-purpose client: 30s timeout, 3 retries from a 1s base delay
    ///
    /// # Errors
    ///
    /// `InvalidRequest` if the configured base URL is malformed
    pub fn default_client(logger: Arc<Logger>) -> Result<Self, RequestError> {
        Self::default_builder(logger).build()
    }

    /// Client for the bridge configuration endpoint: 5s timeout
    ///
    /// # Errors
    ///
    /// `InvalidRequest` if the configured base URL is malformed
    pub fn bridge_config_client(logger: Arc<Logger>) -> Result<Self, RequestError> {
        Self::bridge_config_builder(logger).build()
    }

    /// Builder preloaded with the [`default_client`](Self::default_client) preset
    pub fn default_builder(logger: Arc<Logger>) -> ClientBuilder {
        Self::preset(logger, DEFAULT_TIMEOUT)
    }

    /// Builder preloaded with the [`bridge_config_client`](Self::bridge_config_client) preset
    pub fn bridge_config_builder(logger: Arc<Logger>) -> ClientBuilder {
        Self::preset(logger, BRIDGE_CONFIG_TIMEOUT)
    }

    /// Failures are logged once by the handler; the interceptor only traces
    fn preset(logger: Arc<Logger>, timeout: Duration) -> ClientBuilder {
        ClientBuilder::new()
            .timeout(timeout)
            .retry_policy(RetryPolicy::default())
            .error_handler(LoggingErrorHandler::new(Arc::clone(&logger)))
            .interceptor(NetworkLogInterceptor::new(logger))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Send a request, retrying transient failures
    ///
    /// # Errors
    ///
    /// The classified failure of the last attempt. It has already been
    /// passed to the error handler. A request with illegal headers fails
    /// with `InvalidRequest` before anything is sent or reported.
    pub async fn send(&self, request: Request) -> Result<Response, RequestError> {
        let outbound = self.prepare(request)?;
        self.execute(&outbound).await
    }

    /// POST `body` as JSON and decode the response body as `T`
    ///
    /// # Errors
    ///
    /// Any `send` failure, or `Decode` if the body does not fit `T`
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, RequestError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = Request::post(path).json(body)?;
        self.request_json(request).await
    }

    /// GET `path` and decode the response body as `T`
    ///
    /// # Errors
    ///
    /// Any `send` failure, or `Decode` if the body does not fit `T`
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, RequestError> {
        self.request_json(Request::get(path)).await
    }

    async fn request_json<T: DeserializeOwned>(&self, request: Request) -> Result<T, RequestError> {
        let outbound = self.prepare(request)?;
        let response = self.execute(&outbound).await?;
        serde_json::from_value(response.body).map_err(|e| {
            self.fail(
                &outbound,
                RequestError::decode(response.status, e.to_string()),
                response.attempts,
            )
        })
    }

    fn prepare(&self, mut request: Request) -> Result<OutboundRequest, RequestError> {
        for interceptor in &self.interceptors {
            interceptor.on_request(&mut request);
        }
        request.validate()?;
        Ok(OutboundRequest {
            url: self.resolve(&request.path),
            method: request.method,
            headers: request.headers,
            body: request.body,
            timeout: self.timeout,
        })
    }

    async fn execute(&self, outbound: &OutboundRequest) -> Result<Response, RequestError> {
        let mut attempt: u32 = 0;
        loop {
            let result = match self.transport.execute(outbound).await {
                Ok(raw) => self.classifier.classify(&raw).map(|body| Response {
                    status: raw.status,
                    body,
                    attempts: attempt + 1,
                }),
                Err(failure) => Err(RequestError::from(failure)),
            };

            match result {
                Ok(response) => {
                    for interceptor in &self.interceptors {
                        interceptor.on_response(outbound, &response);
                    }
                    return Ok(response);
                }
                Err(error) if self.retry.should_retry(attempt, &error) => {
                    let delay = self.retry.delay_for(attempt);
                    for interceptor in &self.interceptors {
                        interceptor.on_retry(outbound, attempt, &error, delay);
                    }
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(error) => return Err(self.fail(outbound, error, attempt + 1)),
            }
        }
    }

    /// Report a terminal failure
    fn fail(&self, outbound: &OutboundRequest, error: RequestError, attempts: u32) -> RequestError {
        self.error_handler.handle(&error);
        for interceptor in &self.interceptors {
            interceptor.on_failure(outbound, &error, attempts);
        }
        error
    }

    fn resolve(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        if path.is_empty() {
            base.to_string()
        } else {
            format!("{}/{}", base, path)
        }
    }
}

impl fmt::Debug for RequestClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestClient")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("retry", &self.retry)
            .field("interceptors", &self.interceptors.len())
            .finish_non_exhaustive()
    }
}

/// Builder for [`RequestClient`]
///
/// Unset parts default to: base URL from the environment, 30s timeout,
/// [`RetryPolicy::default`], [`BusinessCodeClassifier`], a reqwest
/// transport, and a [`LoggingErrorHandler`] on the global logger.
pub struct ClientBuilder {
    base_url: Option<String>,
    timeout: Duration,
    retry: RetryPolicy,
    classifier: Arc<dyn ResponseClassifier>,
    transport: Option<Arc<dyn Transport>>,
    error_handler: Option<Arc<dyn ErrorHandler>>,
    interceptors: Vec<Arc<dyn Interceptor>>,
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self {
            base_url: None,
            timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
            classifier: Arc::new(BusinessCodeClassifier),
            transport: None,
            error_handler: None,
            interceptors: Vec::new(),
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry = policy;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn classifier<C: ResponseClassifier + 'static>(mut self, classifier: C) -> Self {
        self.classifier = Arc::new(classifier);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn error_handler<H: ErrorHandler + 'static>(mut self, handler: H) -> Self {
        self.error_handler = Some(Arc::new(handler));
        self
    }

    /// Append to the interceptor chain; hooks run in insertion order
    #[must_use = "builder methods return a new value"]
    pub fn interceptor<I: Interceptor + 'static>(mut self, interceptor: I) -> Self {
        self.interceptors.push(Arc::new(interceptor));
        self
    }

    /// # Errors
    ///
    /// `InvalidRequest` for a malformed base URL, a zero timeout, or an
    /// HTTP client that cannot be constructed
    pub fn build(self) -> Result<RequestClient, RequestError> {
        let base_url = self.base_url.unwrap_or_else(base_url_from_env);
        let parsed = reqwest::Url::parse(&base_url)
            .map_err(|e| RequestError::invalid(format!("invalid base URL '{}': {}", base_url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(RequestError::invalid(format!(
                "base URL '{}' must use http or https",
                base_url
            )));
        }
        if self.timeout.is_zero() {
            return Err(RequestError::invalid("timeout must be greater than zero"));
        }

        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new()?),
        };
        let error_handler = self
            .error_handler
            .unwrap_or_else(|| Arc::new(LoggingErrorHandler::global()));

        Ok(RequestClient {
            base_url,
            timeout: self.timeout,
            retry: self.retry,
            classifier: self.classifier,
            transport,
            error_handler,
            interceptors: self.interceptors,
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
