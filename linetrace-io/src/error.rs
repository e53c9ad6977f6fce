//! Error types for LinetraceIO

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// LinetraceIO error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Actuator rejected or failed a write
    #[error("Actuator fault: {0}")]
    Actuator(String),

    /// Invalid parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}
