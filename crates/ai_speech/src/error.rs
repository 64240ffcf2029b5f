//! Speech processing errors

use thiserror::Error;

/// Errors that can occur during speech processing
#[derive(Debug, Error)]
pub enum SpeechError {
    /// Failed to connect to speech service
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request to speech service failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Invalid audio data
    #[error("Invalid audio: {0}")]
    InvalidAudio(String),

    /// Vendor reported usage or rate limits were reached
    #[error("API quota exceeded. Please check your billing or wait for quota reset.")]
    QuotaExceeded,

    /// Vendor rejected the audio container or codec
    #[error("Audio format not supported. Please try recording in a different format.")]
    UnsupportedFormat,

    /// Client was built without usable configuration
    #[error("Speech client not initialized: {0}")]
    NotInitialized(String),

    /// The attempt budget for inline requests is spent
    #[error("Audio transcription temporarily unavailable due to quota limits. Please try text input or wait a moment and retry.")]
    TemporarilyUnavailable,

    /// Backend answered but produced no text
    #[error("No transcription generated after multiple attempts")]
    EmptyTranscript,

    /// Every attempt failed with a generic error
    #[error("Transcription failed after {attempts} attempts: {message}")]
    RetriesExhausted {
        /// Number of attempts made
        attempts: u32,
        /// Last error message
        message: String,
    },

    /// Transcription failed
    #[error("Transcription failed: {0}")]
    TranscriptionFailed(String),

    /// Synthesis failed
    #[error("Synthesis failed: {0}")]
    SynthesisFailed(String),

    /// Invalid response from service
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The HTTP client timeout elapsed
    #[error("Speech processing timed out")]
    Timeout,

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Credential file or token exchange problem
    #[error("Authentication failed: {0}")]
    Authentication(String),
}

impl SpeechError {
    /// Whether this is the quota-limit outcome that callers may answer with a fallback
    #[must_use]
    pub const fn is_quota(&self) -> bool {
        matches!(self, Self::QuotaExceeded | Self::TemporarilyUnavailable)
    }
}

// Request URLs may carry credentials, so they are stripped from the message
impl From<reqwest::Error> for SpeechError {
    fn from(err: reqwest::Error) -> Self {
        let err = err.without_url();
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::ConnectionFailed(err.to_string())
        } else {
            Self::RequestFailed(err.to_string())
        }
    }
}
