//! Logging macros for ergonomic title formatting.
//!
//! The formatted string becomes the entry title; data, error and context
//! are left empty. Use the `Logger` methods directly to attach them.
//!
//! # Examples
//!
//! ```
//! use bridge_resilience::prelude::*;
//! use bridge_resilience::info;
//!
//! let logger = Logger::builder().enable_remote(false).build().unwrap();
//!
//! info!(logger, LogCategory::Bridge, "Route selected");
//!
//! let chain_id = 1;
//! info!(logger, LogCategory::Network, "Switched to chain {}", chain_id);
//! ```

/// Log a formatted title at an explicit level.
///
/// # Examples
///
/// ```
/// # use bridge_resilience::prelude::*;
/// # let logger = Logger::builder().enable_remote(false).build().unwrap();
/// use bridge_resilience::log;
/// log!(logger, LogLevel::Info, LogCategory::General, "Simple title");
/// log!(logger, LogLevel::Error, LogCategory::Api, "Status code: {}", 502);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $category:expr, $($arg:tt)+) => {
        $logger.log($level, $category, format!($($arg)+), None, None, None, None)
    };
}

/// Log a debug-level title.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $category:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $category, $($arg)+)
    };
}

/// Log an info-level title.
///
/// # Examples
///
/// ```
/// # use bridge_resilience::prelude::*;
/// # let logger = Logger::builder().enable_remote(false).build().unwrap();
/// use bridge_resilience::info;
/// info!(logger, LogCategory::Wallet, "Wallet connected");
/// info!(logger, LogCategory::Transaction, "Pending transactions: {}", 2);
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $category:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $category, $($arg)+)
    };
}

/// Log a warning-level title.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $category:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $category, $($arg)+)
    };
}

/// Log an error-level title.
#[macro_export]
macro_rules! error {
    ($logger:expr, $category:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $category, $($arg)+)
    };
}

/// Log a critical-level title.
#[macro_export]
macro_rules! critical {
    ($logger:expr, $category:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Critical, $category, $($arg)+)
    };
}
