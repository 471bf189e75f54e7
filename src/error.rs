//! Error types for the branch reporting engine.

use thiserror::Error;

/// Main error type for report operations.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Can't modify the reserved property \"{0}\"")]
    ReservedProperty(String),

    #[error("Branch name must not be empty")]
    EmptyBranchName,

    #[error("Commit timestamp out of range: {0}")]
    TimestampOutOfRange(i64),

    #[error("Not a canonical commit time: {0}")]
    InvalidCanonicalTime(String),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for ReportError {
    fn from(e: serde_json::Error) -> Self {
        ReportError::Serialization(e.to_string())
    }
}

/// Result type for report operations.
pub type Result<T> = std::result::Result<T, ReportError>;
