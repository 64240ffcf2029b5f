//! Backend-selecting transcription client

use async_trait::async_trait;
use domain::{LanguageCode, TranscriptSet};
use tracing::{info, warn};

use crate::config::{SpeechConfig, SpeechMode};
use crate::error::SpeechError;
use crate::ports::SpeechToText;
use crate::providers::{CloudSpeechProvider, GeminiTranscriber};
use crate::types::AudioData;

/// Transcription client with its backend fixed at construction
///
/// Building never fails: a configuration problem yields [`SpeechClient::NotReady`],
/// which answers every call with [`SpeechError::NotInitialized`].
#[derive(Debug)]
pub enum SpeechClient {
    /// Cloud Speech with service-account credentials
    Sdk(CloudSpeechProvider),
    /// Cloud Speech with an API key
    Rest(CloudSpeechProvider),
    /// Generative model with inline audio
    Generative(GeminiTranscriber),
    /// Configuration was missing or unusable
    NotReady {
        /// Backend that was requested
        mode: SpeechMode,
        /// Why it could not be built
        reason: String,
    },
}

impl SpeechClient {
    /// Build the backend named by `config.mode`
    pub fn from_config(config: &SpeechConfig) -> Self {
        match Self::try_from_config(config) {
            Ok(client) => {
                info!(backend = config.mode.as_str(), "🎙️ Speech client ready");
                client
            },
            Err(e) => {
                warn!(backend = config.mode.as_str(), error = %e, "Speech client not ready");
                Self::NotReady {
                    mode: config.mode,
                    reason: e.to_string(),
                }
            },
        }
    }

    fn try_from_config(config: &SpeechConfig) -> Result<Self, SpeechError> {
        config.validate().map_err(SpeechError::Configuration)?;
        Ok(match config.mode {
            SpeechMode::Sdk => Self::Sdk(CloudSpeechProvider::with_service_account(config)?),
            SpeechMode::Rest => Self::Rest(CloudSpeechProvider::with_api_key(config)?),
            SpeechMode::Generative => Self::Generative(GeminiTranscriber::new(config)?),
        })
    }

    /// Reason the client is not ready, if it is not
    #[must_use]
    pub fn not_ready_reason(&self) -> Option<&str> {
        match self {
            Self::NotReady { reason, .. } => Some(reason),
            _ => None,
        }
    }

    fn backend(&self) -> Option<&dyn SpeechToText> {
        match self {
            Self::Sdk(p) | Self::Rest(p) => Some(p as &dyn SpeechToText),
            Self::Generative(g) => Some(g as &dyn SpeechToText),
            Self::NotReady { .. } => None,
        }
    }
}

#[async_trait]
impl SpeechToText for SpeechClient {
    async fn transcribe(
        &self,
        audio: AudioData,
        language: &LanguageCode,
    ) -> Result<TranscriptSet, SpeechError> {
        match self {
            Self::NotReady { reason, .. } => Err(SpeechError::NotInitialized(reason.clone())),
            Self::Sdk(p) | Self::Rest(p) => p.transcribe(audio, language).await,
            Self::Generative(g) => g.transcribe(audio, language).await,
        }
    }

    fn is_ready(&self) -> bool {
        self.backend().is_some()
    }

    fn backend_name(&self) -> &'static str {
        match self {
            Self::Sdk(_) => "sdk",
            Self::Rest(_) => "rest",
            Self::Generative(_) => "generative",
            Self::NotReady { .. } => "none",
        }
    }

    fn model_name(&self) -> Option<&str> {
        self.backend().and_then(|backend| backend.model_name())
    }
}
