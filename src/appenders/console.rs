//! Console appender implementation

use crate::core::{Appender, LogEntry, Result};
#[cfg(feature = "console")]
use colored::Colorize;

/// Writes entries as single prefixed lines
///
/// The prefix carries the level and category so console output can be
/// filtered by eye: `[WARN ][bridge]【Quote stale】 message data`.
/// Error and Critical go to stderr, everything else to stdout.
pub struct ConsoleAppender {
    use_colors: bool,
    show_timestamp: bool,
}

impl ConsoleAppender {
    pub fn new() -> Self {
        Self {
            use_colors: cfg!(feature = "console"),
            show_timestamp: true,
        }
    }

    pub fn with_colors(use_colors: bool) -> Self {
        Self {
            use_colors,
            show_timestamp: true,
        }
    }

    #[must_use]
    pub fn with_timestamp(mut self, show: bool) -> Self {
        self.show_timestamp = show;
        self
    }

    fn level_tag(&self, entry: &LogEntry) -> String {
        let tag = format!("{:5}", entry.level.to_str());
        #[cfg(feature = "console")]
        if self.use_colors {
            return tag.color(entry.level.color_code()).to_string();
        }
        tag
    }

    /// Render one entry without a trailing newline
    pub fn format_line(&self, entry: &LogEntry) -> String {
        let mut line = String::new();

        if self.show_timestamp {
            line.push_str(&format!(
                "[{}] ",
                entry.timestamp.format("%Y-%m-%d %H:%M:%S%.3f")
            ));
        }

        line.push_str(&format!(
            "[{}][{}]【{}】",
            self.level_tag(entry),
            entry.category,
            entry.title
        ));

        if let Some(ref message) = entry.message {
            line.push(' ');
            line.push_str(message);
        }
        if let Some(ref error) = entry.error {
            line.push_str(&format!(" ({})", error));
        }
        if let Some(ref data) = entry.data {
            line.push(' ');
            line.push_str(&data.to_string());
        }
        if let Some(ref context) = entry.context {
            if !context.is_empty() {
                line.push_str(" | ");
                line.push_str(&context.format_fields());
            }
        }

        line
    }
}

impl Default for ConsoleAppender {
    fn default() -> Self {
        Self::new()
    }
}

impl Appender for ConsoleAppender {
    fn append(&mut self, entry: &LogEntry) -> Result<()> {
        let output = self.format_line(entry);

        if entry.level.is_error() {
            eprintln!("{}", output);
        } else {
            println!("{}", output);
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        use std::io::Write;
        std::io::stdout().flush()?;
        std::io::stderr().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ErrorInfo, LogCategory, LogContext, LogLevel};
    use serde_json::json;

    fn plain() -> ConsoleAppender {
        ConsoleAppender::with_colors(false).with_timestamp(false)
    }

    #[test]
    fn test_prefix_carries_level_category_and_title() {
        let entry = LogEntry::new(LogLevel::Warn, LogCategory::Bridge, "Quote stale");
        assert_eq!(plain().format_line(&entry), "[WARN ][bridge]【Quote stale】");
    }

    #[test]
    fn test_all_parts_rendered() {
        let entry = LogEntry::new(LogLevel::Error, LogCategory::Api, "Request failed")
            .with_error(ErrorInfo::new("RequestError", "HTTP 503"))
            .with_data(json!({"attempts": 4}))
            .with_context(LogContext::new().with_field("host", "bridge.example"));

        let line = plain().format_line(&entry);
        assert_eq!(
            line,
            "[ERROR][api]【Request failed】 HTTP 503 (RequestError: HTTP 503) {\"attempts\":4} | host=bridge.example"
        );
    }

    #[test]
    fn test_timestamp_prefix() {
        let entry = LogEntry::new(LogLevel::Info, LogCategory::General, "Ready");
        let line = ConsoleAppender::with_colors(false).format_line(&entry);
        assert!(line.starts_with('['));
        assert!(line.contains("] [INFO ][general]【Ready】"));
    }

    #[test]
    fn test_append_and_flush() {
        let mut appender = plain();
        let entry = LogEntry::new(LogLevel::Debug, LogCategory::Debug, "sample");
        assert!(appender.append(&entry).is_ok());
        assert!(appender.flush().is_ok());
        assert_eq!(appender.name(), "console");
    }
}
