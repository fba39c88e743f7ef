//! Error types for the request client

use std::fmt;

/// Longest response body excerpt kept in an error
const BODY_EXCERPT_LEN: usize = 200;

/// Failure classes used by retry and error-handling decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No response reached the client
    Transport,
    Timeout,
    /// HTTP 5xx
    Server,
    /// HTTP 4xx, undecodable bodies, and local validation
    Client,
    /// Non-zero application code inside an HTTP 200 body
    Business,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Transport => "transport",
            ErrorKind::Timeout => "timeout",
            ErrorKind::Server => "server",
            ErrorKind::Client => "client",
            ErrorKind::Business => "business",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    /// Connection could not be made or broke before a response arrived
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// Connect or read deadline exceeded
    #[error("Request timeout: {message}")]
    Timeout { message: String },

    #[error("Server error (HTTP {status}): {body}")]
    Server { status: u16, body: String },

    #[error("Client error (HTTP {status}): {body}")]
    Client { status: u16, body: String },

    /// The transport succeeded but the payload carries a failure code
    #[error("Business error {code}: {message}")]
    Business {
        code: i64,
        message: String,
        status: u16,
    },

    #[error("Failed to decode response (HTTP {status}): {message}")]
    Decode { status: u16, message: String },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl RequestError {
    pub fn transport(message: impl Into<String>) -> Self {
        RequestError::Transport {
            message: message.into(),
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        RequestError::Timeout {
            message: message.into(),
        }
    }

    /// Build an HTTP status error, keeping a short excerpt of the body
    ///
    /// Statuses >= 500 become `Server`, everything else `Client`.
    pub fn http(status: u16, body: &[u8]) -> Self {
        let body: String = String::from_utf8_lossy(body)
            .chars()
            .take(BODY_EXCERPT_LEN)
            .collect();
        if status >= 500 {
            RequestError::Server { status, body }
        } else {
            RequestError::Client { status, body }
        }
    }

    pub fn business(code: i64, message: impl Into<String>) -> Self {
        RequestError::Business {
            code,
            message: message.into(),
            status: 200,
        }
    }

    pub fn decode(status: u16, message: impl Into<String>) -> Self {
        RequestError::Decode {
            status,
            message: message.into(),
        }
    }

    pub fn invalid<S: Into<String>>(message: S) -> Self {
        RequestError::InvalidRequest(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            RequestError::Transport { .. } => ErrorKind::Transport,
            RequestError::Timeout { .. } => ErrorKind::Timeout,
            RequestError::Server { .. } => ErrorKind::Server,
            RequestError::Business { .. } => ErrorKind::Business,
            RequestError::Client { .. }
            | RequestError::Decode { .. }
            | RequestError::InvalidRequest(_) => ErrorKind::Client,
        }
    }

    /// HTTP status of the response, if one was received
    pub fn status(&self) -> Option<u16> {
        match self {
            RequestError::Server { status, .. }
            | RequestError::Client { status, .. }
            | RequestError::Business { status, .. }
            | RequestError::Decode { status, .. } => Some(*status),
            RequestError::Transport { .. }
            | RequestError::Timeout { .. }
            | RequestError::InvalidRequest(_) => None,
        }
    }

    pub fn has_response(&self) -> bool {
        self.status().is_some()
    }

    /// Flagged as a timeout, or a response-less failure whose text says so
    ///
    /// Response bodies are never inspected: a 4xx that mentions a timeout is
    /// still a client error.
    pub fn is_timeout(&self) -> bool {
        match self {
            RequestError::Timeout { .. } => true,
            RequestError::Transport { message } => message.to_lowercase().contains("timeout"),
            _ => false,
        }
    }

    pub fn is_business(&self) -> bool {
        matches!(self, RequestError::Business { .. })
    }

    pub fn business_code(&self) -> Option<i64> {
        match self {
            RequestError::Business { code, .. } => Some(*code),
            _ => None,
        }
    }
}
