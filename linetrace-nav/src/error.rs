//! Error types for LinetraceNav

use thiserror::Error;

/// LinetraceNav error type
#[derive(Error, Debug)]
pub enum NavError {
    #[error("Actuator error: {0}")]
    Actuator(#[from] linetrace_io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Navigation cancelled")]
    Cancelled,
}

impl From<toml::de::Error> for NavError {
    fn from(e: toml::de::Error) -> Self {
        NavError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, NavError>;
