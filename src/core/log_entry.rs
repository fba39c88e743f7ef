//! Log entry structure

use super::log_category::LogCategory;
use super::log_context::LogContext;
use super::log_level::LogLevel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Serializable snapshot of an error attached to an entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub kind: String,
    pub message: String,
}

impl ErrorInfo {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// Capture any error value, keeping its display text
    pub fn from_error<E: std::error::Error + ?Sized>(error: &E) -> Self {
        let kind = std::any::type_name::<E>()
            .rsplit("::")
            .next()
            .unwrap_or("Error")
            .to_string();
        Self {
            kind,
            message: error.to_string(),
        }
    }

    /// Wrap a bare message, for callers that only have text
    pub fn from_message(message: impl fmt::Display) -> Self {
        Self::new("Error", message.to_string())
    }
}

impl fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// A single log record
///
/// `timestamp` is set when the entry is created, not when it is delivered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub category: LogCategory,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<LogContext>,
}

impl LogEntry {
    /// Sanitize text to prevent log injection attacks
    ///
    /// Replaces newlines, carriage returns, and tabs with escape sequences
    /// so a single entry always renders as a single console line.
    fn sanitize(text: &str) -> String {
        text.replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t")
    }

    pub fn new(level: LogLevel, category: LogCategory, title: impl AsRef<str>) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            category,
            title: Self::sanitize(title.as_ref()),
            message: None,
            data: None,
            error: None,
            context: None,
        }
    }

    pub fn with_message(mut self, message: impl AsRef<str>) -> Self {
        self.message = Some(Self::sanitize(message.as_ref()));
        self
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Attach an error; its text also becomes the entry message when none is set
    pub fn with_error(mut self, error: ErrorInfo) -> Self {
        if self.message.is_none() {
            self.message = Some(Self::sanitize(&error.message));
        }
        self.error = Some(error);
        self
    }

    pub fn with_context(mut self, context: LogContext) -> Self {
        self.context = Some(context);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_and_message_are_sanitized() {
        let entry = LogEntry::new(LogLevel::Info, LogCategory::General, "line1\nline2")
            .with_message("a\tb\rc");
        assert_eq!(entry.title, "line1\\nline2");
        assert_eq!(entry.message.as_deref(), Some("a\\tb\\rc"));
    }

    #[test]
    fn test_error_fills_message() {
        let entry = LogEntry::new(LogLevel::Error, LogCategory::Error, "Swap failed")
            .with_error(ErrorInfo::new("RequestError", "insufficient liquidity"));
        assert_eq!(entry.message.as_deref(), Some("insufficient liquidity"));

        let entry = LogEntry::new(LogLevel::Error, LogCategory::Error, "Swap failed")
            .with_message("explicit")
            .with_error(ErrorInfo::new("RequestError", "ignored for message"));
        assert_eq!(entry.message.as_deref(), Some("explicit"));
    }

    #[test]
    fn test_error_info_from_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::Other, "socket closed");
        let info = ErrorInfo::from_error(&io_err);
        assert_eq!(info.kind, "Error");
        assert_eq!(info.message, "socket closed");
    }

    #[test]
    fn test_optional_fields_are_omitted() {
        let entry = LogEntry::new(LogLevel::Warn, LogCategory::Bridge, "Quote stale");
        let json = serde_json::to_value(&entry).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj["level"], "WARN");
        assert_eq!(obj["category"], "bridge");
        assert!(!obj.contains_key("message"));
        assert!(!obj.contains_key("data"));
        assert!(!obj.contains_key("error"));
        assert!(!obj.contains_key("context"));
    }
}
