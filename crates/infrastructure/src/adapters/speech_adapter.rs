//! Speech adapter - Implements the transcription port using the ai_speech client

use std::sync::Arc;

use ai_speech::{AudioData, SpeechClient, SpeechConfig, SpeechError, SpeechToText};
use application::error::ApplicationError;
use application::ports::{TranscriptionPort, TranscriptionRequest};
use async_trait::async_trait;
use domain::TranscriptSet;
use tracing::{debug, instrument};

/// Adapter exposing a [`SpeechClient`] as a [`TranscriptionPort`]
pub struct SpeechAdapter {
    client: Arc<SpeechClient>,
}

impl std::fmt::Debug for SpeechAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpeechAdapter")
            .field("backend", &self.client.backend_name())
            .field("ready", &self.client.is_ready())
            .finish()
    }
}

impl SpeechAdapter {
    /// Wrap an existing client
    pub fn new(client: SpeechClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    /// Build the client named by `config.mode`
    ///
    /// Never fails; a bad configuration produces a not-ready adapter.
    pub fn from_config(config: &SpeechConfig) -> Self {
        Self::new(SpeechClient::from_config(config))
    }

    /// Reason the client could not be built, if any
    pub fn not_ready_reason(&self) -> Option<&str> {
        self.client.not_ready_reason()
    }
}

/// Map speech error to application error
pub(crate) fn map_speech_error(err: SpeechError) -> ApplicationError {
    let message = err.to_string();
    match err {
        SpeechError::QuotaExceeded => ApplicationError::QuotaExceeded(message),
        SpeechError::UnsupportedFormat => ApplicationError::UnsupportedFormat(message),
        SpeechError::NotInitialized(_) => ApplicationError::NotInitialized(message),
        SpeechError::TemporarilyUnavailable => ApplicationError::TemporarilyUnavailable(message),
        SpeechError::RateLimited => ApplicationError::RateLimited,
        SpeechError::InvalidAudio(e) => ApplicationError::InvalidInput(format!("Invalid audio: {e}")),
        SpeechError::SynthesisFailed(e) => ApplicationError::Synthesis(e),
        SpeechError::Configuration(e) => ApplicationError::Configuration(e),
        SpeechError::EmptyTranscript
        | SpeechError::RetriesExhausted { .. }
        | SpeechError::TranscriptionFailed(_)
        | SpeechError::InvalidResponse(_)
        | SpeechError::Timeout
        | SpeechError::ConnectionFailed(_)
        | SpeechError::RequestFailed(_)
        | SpeechError::Authentication(_) => ApplicationError::Transcription(message),
    }
}

#[async_trait]
impl TranscriptionPort for SpeechAdapter {
    #[instrument(skip(self, request), fields(
        backend = self.client.backend_name(),
        data_size = request.audio.len(),
        language = %request.language
    ))]
    async fn transcribe(
        &self,
        request: TranscriptionRequest,
    ) -> Result<TranscriptSet, ApplicationError> {
        let audio = AudioData::new(request.audio).with_sample_rate(request.sample_rate);
        debug!(format = ?audio.format(), "Dispatching audio to speech client");

        self.client
            .transcribe(audio, &request.language)
            .await
            .map_err(map_speech_error)
    }

    fn is_ready(&self) -> bool {
        self.client.is_ready()
    }

    fn backend(&self) -> String {
        self.client.backend_name().to_string()
    }

    fn model(&self) -> Option<String> {
        self.client.model_name().map(str::to_string)
    }
}
