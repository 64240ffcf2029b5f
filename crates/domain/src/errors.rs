//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// Language tag is empty or contains characters outside `[A-Za-z0-9-]`
    #[error("Invalid language code: {0}")]
    InvalidLanguageCode(String),

    /// Corpus document could not be parsed or is structurally wrong
    #[error("Invalid corpus: {0}")]
    InvalidCorpus(String),

    /// Validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidCorpus(err.to_string())
    }
}
