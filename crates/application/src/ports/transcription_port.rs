//! Transcription port - Interface for speech-to-text backends

use async_trait::async_trait;
use domain::{LanguageCode, TranscriptSet};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// One audio clip to transcribe
#[derive(Debug, Clone)]
pub struct TranscriptionRequest {
    /// Raw audio bytes in any supported container
    pub audio: Vec<u8>,
    /// Spoken language
    pub language: LanguageCode,
    /// Sample rate used when the container does not say
    pub sample_rate: u32,
}

impl TranscriptionRequest {
    /// Sample rate assumed when the caller does not supply one
    pub const DEFAULT_SAMPLE_RATE: u32 = 16000;

    /// Request with default language and sample rate
    pub fn new(audio: Vec<u8>) -> Self {
        Self {
            audio,
            language: LanguageCode::default(),
            sample_rate: Self::DEFAULT_SAMPLE_RATE,
        }
    }

    #[must_use]
    pub fn with_language(mut self, language: LanguageCode) -> Self {
        self.language = language;
        self
    }

    #[must_use]
    pub const fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }
}

/// Port for transcription
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TranscriptionPort: Send + Sync {
    /// Transcribe one clip
    async fn transcribe(
        &self,
        request: TranscriptionRequest,
    ) -> Result<TranscriptSet, ApplicationError>;

    /// Whether the backend was configured successfully
    fn is_ready(&self) -> bool;

    /// Backend identifier for health output
    fn backend(&self) -> String;

    /// Model name, if the backend has one
    fn model(&self) -> Option<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_defaults() {
        let request = TranscriptionRequest::new(vec![1, 2]);
        assert_eq!(request.language.as_str(), "vi-VN");
        assert_eq!(request.sample_rate, 16000);
    }

    #[test]
    fn request_builders() {
        let request = TranscriptionRequest::new(vec![])
            .with_language(LanguageCode::parse("en-US").unwrap())
            .with_sample_rate(48000);
        assert_eq!(request.language.as_str(), "en-US");
        assert_eq!(request.sample_rate, 48000);
    }
}
