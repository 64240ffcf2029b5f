//! Port definitions for speech processing
//!
//! Defines the traits (ports) that speech backends implement.

use async_trait::async_trait;
use domain::{LanguageCode, TranscriptSet};

use crate::error::SpeechError;
use crate::types::AudioData;

/// Port for Speech-to-Text (STT) implementations
///
/// # Example
///
/// ```ignore
/// use ai_speech::{AudioData, SpeechToText};
/// use domain::LanguageCode;
///
/// async fn transcribe_clip(stt: &impl SpeechToText, bytes: Vec<u8>) -> Result<String, SpeechError> {
///     let set = stt.transcribe(AudioData::new(bytes), &LanguageCode::default()).await?;
///     Ok(set.full_transcript())
/// }
/// ```
#[async_trait]
pub trait SpeechToText: Send + Sync {
    /// Transcribe audio in the given language
    ///
    /// # Errors
    ///
    /// Returns `SpeechError` if transcription fails or the backend is not ready.
    async fn transcribe(
        &self,
        audio: AudioData,
        language: &LanguageCode,
    ) -> Result<TranscriptSet, SpeechError>;

    /// Whether the backend was configured successfully
    fn is_ready(&self) -> bool;

    /// Short backend identifier (`sdk`, `rest`, `generative`, `none`)
    fn backend_name(&self) -> &'static str;

    /// Model name, when the backend is driven by a named model
    fn model_name(&self) -> Option<&str>;
}

/// Port for Text-to-Speech (TTS) implementations
#[async_trait]
pub trait TextToSpeech: Send + Sync {
    /// Synthesize `text` spoken in `language` (primary subtag, e.g. `vi`)
    ///
    /// # Errors
    ///
    /// Returns `SpeechError` if the text is empty or synthesis fails.
    async fn synthesize(&self, text: &str, language: &str) -> Result<AudioData, SpeechError>;
}
