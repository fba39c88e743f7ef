//! Canonical error codes and terminal-failure reporting
//!
//! Every request failure that survives the retry loop is handed to an
//! [`ErrorHandler`] exactly once. The default handler writes a single
//! Error/Api entry to a [`Logger`].

use crate::client::RequestError;
use crate::core::{ErrorInfo, LogCategory, Logger};
use serde_json::json;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NetworkError,
    TimeoutError,
    ServerError,
    ClientError,
    Unauthorized,
    RateLimited,
    BusinessError,
    DecodeError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NetworkError => "NETWORK_ERROR",
            ErrorCode::TimeoutError => "TIMEOUT_ERROR",
            ErrorCode::ServerError => "SERVER_ERROR",
            ErrorCode::ClientError => "CLIENT_ERROR",
            ErrorCode::Unauthorized => "UNAUTHORIZED",
            ErrorCode::RateLimited => "RATE_LIMITED",
            ErrorCode::BusinessError => "BUSINESS_ERROR",
            ErrorCode::DecodeError => "DECODE_ERROR",
        }
    }

    /// Canonical code for a request failure
    pub fn from_error(error: &RequestError) -> Self {
        match error {
            RequestError::Timeout { .. } => ErrorCode::TimeoutError,
            RequestError::Transport { .. } if error.is_timeout() => ErrorCode::TimeoutError,
            RequestError::Transport { .. } => ErrorCode::NetworkError,
            RequestError::Server { .. } => ErrorCode::ServerError,
            RequestError::Client { status, .. } => match status {
                401 | 403 => ErrorCode::Unauthorized,
                429 => ErrorCode::RateLimited,
                _ => ErrorCode::ClientError,
            },
            RequestError::Business { code, .. } => map_business_error_code(*code),
            RequestError::Decode { .. } => ErrorCode::DecodeError,
            RequestError::InvalidRequest(_) => ErrorCode::ClientError,
        }
    }

    /// Text suitable for showing to an end user
    pub fn user_message(&self) -> &'static str {
        match self {
            ErrorCode::NetworkError => "Network connection failed. Please check your connection.",
            ErrorCode::TimeoutError => "The request timed out. Please try again.",
            ErrorCode::ServerError => "The service is temporarily unavailable. Please try again later.",
            ErrorCode::ClientError => "The request could not be processed.",
            ErrorCode::Unauthorized => "You are not authorized to perform this action.",
            ErrorCode::RateLimited => "Too many requests. Please wait a moment.",
            ErrorCode::BusinessError => "The operation could not be completed.",
            ErrorCode::DecodeError => "Received an unexpected response from the service.",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map an application `code` to the canonical taxonomy
///
/// All non-zero codes collapse to `BusinessError`; callers keep the number.
pub fn map_business_error_code(_code: i64) -> ErrorCode {
    ErrorCode::BusinessError
}

/// Receives each terminal request failure once
///
/// Closures of the form `Fn(&RequestError)` implement this trait.
pub trait ErrorHandler: Send + Sync {
    fn handle(&self, error: &RequestError);
}

impl<F> ErrorHandler for F
where
    F: Fn(&RequestError) + Send + Sync,
{
    fn handle(&self, error: &RequestError) {
        self(error)
    }
}

/// Logs terminal failures at Error/Api
pub struct LoggingErrorHandler {
    logger: Arc<Logger>,
}

impl LoggingErrorHandler {
    pub fn new(logger: Arc<Logger>) -> Self {
        Self { logger }
    }

    /// Handler on the process-wide logger
    pub fn global() -> Self {
        Self::new(Logger::global())
    }
}

impl ErrorHandler for LoggingErrorHandler {
    fn handle(&self, error: &RequestError) {
        let code = ErrorCode::from_error(error);
        let message = match error {
            RequestError::Business { message, .. } => message.clone(),
            other => other.to_string(),
        };

        self.logger.error(
            LogCategory::Api,
            format!("[{}] {}", code, message),
            Some(ErrorInfo::from_error(error)),
            Some(json!({
                "code": code.as_str(),
                "kind": error.kind().to_string(),
                "status": error.status(),
                "businessCode": error.business_code(),
            })),
        );
    }
}
