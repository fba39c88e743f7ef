//! Appender and sink implementations

pub mod console;
pub mod remote;

pub use console::ConsoleAppender;
pub use remote::{HttpBatchSink, DEFAULT_DELIVERY_TIMEOUT};

// Re-export traits for convenience
pub use crate::core::{Appender, BatchSink};
