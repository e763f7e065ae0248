//! Error types for the Yggdrasil core library.

use thiserror::Error;

/// Top-level error type for all core operations.
#[derive(Error, Debug)]
pub enum YggError {
    /// A bias report was requested for a concept with no timeline entries.
    #[error("No data for concept '{0}'")]
    UnknownConcept(String),

    /// Collaborator output could not be turned into a valid event.
    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    /// Serialization or deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for YggError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, YggError>;
