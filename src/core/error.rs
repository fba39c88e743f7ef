//! Error types for the logger

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Remote collector could not be reached or rejected the batch
    #[error("Remote delivery to '{endpoint}' failed: {message}")]
    DeliveryFailed { endpoint: String, message: String },

    /// Logger already torn down
    #[error("Logger already stopped")]
    LoggerStopped,

    /// The process-wide logger was installed twice
    #[error("Global logger already initialized")]
    AlreadyInitialized,

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// Flush worker could not be started or reached
    #[error("Flush worker unavailable: {0}")]
    WorkerUnavailable(String),
}

impl LoggerError {
    /// Create a remote delivery error
    pub fn delivery(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::DeliveryFailed {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    pub fn worker<S: Into<String>>(msg: S) -> Self {
        LoggerError::WorkerUnavailable(msg.into())
    }
}
