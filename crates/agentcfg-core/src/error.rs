//! Error types for configuration records.

use crate::ValidationFailure;
use thiserror::Error;

/// Errors returned while validating or decoding a configuration record.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The schema engine rejected the record.
    #[error("Failed to validate configuration: {}", .reasons.join(", "))]
    Invalid { reasons: Vec<String> },
    /// Converting the record into a typed view failed.
    #[error("failed to decode config: {0}")]
    DecodeFailed(#[from] serde_json::Error),
}

impl ConfigError {
    /// Individual reasons reported by the schema engine, if any.
    pub fn reasons(&self) -> &[String] {
        match self {
            ConfigError::Invalid { reasons } => reasons,
            ConfigError::DecodeFailed(_) => &[],
        }
    }
}

impl From<ValidationFailure> for ConfigError {
    fn from(failure: ValidationFailure) -> Self {
        ConfigError::Invalid {
            reasons: failure.into_reasons(),
        }
    }
}
