//! Text-to-speech adapter - Implements the synthesis port with Google Translate TTS

use ai_speech::{AudioData, GoogleTranslateTts, TextToSpeech, TtsConfig};
use application::error::ApplicationError;
use application::ports::SpeechSynthesisPort;
use async_trait::async_trait;
use tracing::instrument;

use super::speech_adapter::map_speech_error;

/// Adapter for [`GoogleTranslateTts`]
#[derive(Debug)]
pub struct TtsAdapter {
    tts: GoogleTranslateTts,
}

impl TtsAdapter {
    /// Create an adapter from TTS settings
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn new(config: TtsConfig) -> Result<Self, ApplicationError> {
        let tts = GoogleTranslateTts::new(config).map_err(map_speech_error)?;
        Ok(Self { tts })
    }
}

#[async_trait]
impl SpeechSynthesisPort for TtsAdapter {
    #[instrument(skip(self, text), fields(text_len = text.len(), language = %language))]
    async fn synthesize(&self, text: String, language: String) -> Result<Vec<u8>, ApplicationError> {
        self.tts
            .synthesize(&text, &language)
            .await
            .map(AudioData::into_data)
            .map_err(map_speech_error)
    }
}
