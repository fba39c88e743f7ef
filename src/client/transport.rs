//! HTTP transport abstraction
//!
//! A transport performs exactly one exchange. It reports every HTTP status
//! as a [`RawResponse`]; deciding what a status means is the classifier's
//! job. Only the absence of a response is a [`TransportFailure`].

use super::error::RequestError;
use async_trait::async_trait;
use reqwest::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::time::Duration;

/// Caller-facing request, relative to the client's base URL
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Attach a JSON body
    ///
    /// # Errors
    ///
    /// `InvalidRequest` if `body` cannot be serialized
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, RequestError> {
        let value = serde_json::to_value(body)
            .map_err(|e| RequestError::invalid(format!("unserializable body: {}", e)))?;
        self.body = Some(value);
        Ok(self)
    }

    /// Check that every header is a legal HTTP header
    ///
    /// # Errors
    ///
    /// `InvalidRequest` naming the first bad header
    pub fn validate(&self) -> Result<(), RequestError> {
        parse_headers(&self.headers)
            .map(|_| ())
            .map_err(RequestError::invalid)
    }
}

fn parse_headers(headers: &[(String, String)]) -> Result<Vec<(HeaderName, HeaderValue)>, String> {
    headers
        .iter()
        .map(|(name, value)| {
            let parsed_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| format!("bad header name '{}': {}", name, e))?;
            let parsed_value = HeaderValue::from_str(value)
                .map_err(|e| format!("bad value for header '{}': {}", name, e))?;
            Ok((parsed_name, parsed_value))
        })
        .collect()
}

/// Fully resolved request handed to a transport, reused across retries
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// JSON response with the given status
    pub fn json(status: u16, body: &Value) -> Self {
        Self::new(status, body.to_string())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportFailureKind {
    Connect,
    Timeout,
    Other,
}

/// No response was received
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportFailure {
    pub kind: TransportFailureKind,
    pub message: String,
}

impl TransportFailure {
    pub fn new(kind: TransportFailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for TransportFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl From<TransportFailure> for RequestError {
    fn from(failure: TransportFailure) -> Self {
        match failure.kind {
            TransportFailureKind::Timeout => RequestError::timeout(failure.message),
            TransportFailureKind::Connect | TransportFailureKind::Other => {
                RequestError::transport(failure.message)
            }
        }
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: &OutboundRequest) -> Result<RawResponse, TransportFailure>;
}

/// Transport backed by a pooled `reqwest::Client`
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// # Errors
    ///
    /// `InvalidRequest` if the HTTP client cannot be constructed
    pub fn new() -> Result<Self, RequestError> {
        let client = Client::builder()
            .build()
            .map_err(|e| RequestError::invalid(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    fn failure(error: reqwest::Error) -> TransportFailure {
        let kind = if error.is_timeout() {
            TransportFailureKind::Timeout
        } else if error.is_connect() {
            TransportFailureKind::Connect
        } else {
            TransportFailureKind::Other
        };
        TransportFailure::new(kind, error.to_string())
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: &OutboundRequest) -> Result<RawResponse, TransportFailure> {
        let mut builder = self
            .client
            .request(request.method.clone(), &request.url)
            .timeout(request.timeout)
            .header(CONTENT_TYPE, "application/json");

        let headers = parse_headers(&request.headers)
            .map_err(|message| TransportFailure::new(TransportFailureKind::Other, message))?;
        for (name, value) in headers {
            builder = builder.header(name, value);
        }

        if let Some(ref body) = request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(Self::failure)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(Self::failure)?;

        Ok(RawResponse::new(status, body.to_vec()))
    }
}
