//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Vendor usage limits reached
    #[error("{0}")]
    QuotaExceeded(String),

    /// Vendor refused the audio format
    #[error("{0}")]
    UnsupportedFormat(String),

    /// Transcription client was never configured
    #[error("{0}")]
    NotInitialized(String),

    /// Inline attempts used up; caller should fall back
    #[error("{0}")]
    TemporarilyUnavailable(String),

    /// Transcription failed for another reason
    #[error("{0}")]
    Transcription(String),

    /// Speech synthesis failed
    #[error("Synthesis failed: {0}")]
    Synthesis(String),

    /// External service error
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Reading or writing local files failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// Request input was malformed
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Check if this error is retryable
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited | Self::ExternalService(_) | Self::TemporarilyUnavailable(_)
        )
    }

    /// Failure caused by vendor quota, where a client-side fallback helps
    pub const fn is_quota(&self) -> bool {
        matches!(
            self,
            Self::QuotaExceeded(_) | Self::TemporarilyUnavailable(_)
        )
    }

    /// A transcription outcome the caller reports as `{ "error": ... }`
    /// rather than as a server fault
    pub const fn is_transcription_failure(&self) -> bool {
        matches!(
            self,
            Self::QuotaExceeded(_)
                | Self::UnsupportedFormat(_)
                | Self::NotInitialized(_)
                | Self::TemporarilyUnavailable(_)
                | Self::Transcription(_)
                | Self::RateLimited
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transcription_messages_are_passed_through() {
        let err = ApplicationError::UnsupportedFormat("Audio format not supported.".to_string());
        assert_eq!(err.to_string(), "Audio format not supported.");
    }

    #[test]
    fn domain_error_is_transparent() {
        let err: ApplicationError = DomainError::InvalidLanguageCode("x y".to_string()).into();
        assert_eq!(err.to_string(), "Invalid language code: x y");
    }

    #[test]
    fn quota_errors() {
        assert!(ApplicationError::QuotaExceeded(String::new()).is_quota());
        assert!(ApplicationError::TemporarilyUnavailable(String::new()).is_quota());
        assert!(!ApplicationError::Transcription(String::new()).is_quota());
    }

    #[test]
    fn transcription_failures_exclude_server_faults() {
        assert!(ApplicationError::NotInitialized(String::new()).is_transcription_failure());
        assert!(ApplicationError::Transcription(String::new()).is_transcription_failure());
        assert!(!ApplicationError::Internal(String::new()).is_transcription_failure());
        assert!(!ApplicationError::InvalidInput(String::new()).is_transcription_failure());
    }

    #[test]
    fn retryable_errors() {
        assert!(ApplicationError::RateLimited.is_retryable());
        assert!(ApplicationError::ExternalService("down".to_string()).is_retryable());
        assert!(!ApplicationError::Configuration("bad".to_string()).is_retryable());
    }
}
