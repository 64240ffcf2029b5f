//! Speech processing provider implementations
//!
//! Contains concrete implementations of the `SpeechToText` and `TextToSpeech` traits.

pub mod gemini;
pub mod google_cloud;
pub mod google_translate_tts;
pub mod service_account;

/// Header carrying Google API keys, so keys never appear in request URLs
pub(crate) const API_KEY_HEADER: &str = "x-goog-api-key";

pub use gemini::GeminiTranscriber;
pub use google_cloud::CloudSpeechProvider;
pub use google_translate_tts::GoogleTranslateTts;
pub use service_account::{ServiceAccountKey, TokenSource};
