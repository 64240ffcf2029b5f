//! AI Speech - transcription and synthesis clients
//!
//! Provides traits and implementations for speech processing:
//! - `SpeechToText` - Transcribe audio to text (STT)
//! - `TextToSpeech` - Synthesize speech from text (TTS)
//!
//! # Architecture
//!
//! This crate follows the ports & adapters pattern:
//! - `ports` module defines the traits (ports)
//! - `providers` module contains concrete implementations (adapters)
//! - `client` picks one transcription backend from configuration
//!
//! # Supported Providers
//!
//! - Google Cloud Speech-to-Text, with a service account or an API key
//! - Generative multimodal model with inline audio and bounded retries
//! - Google Translate TTS
//!
//! # Example
//!
//! ```ignore
//! use ai_speech::{AudioData, SpeechClient, SpeechConfig, SpeechToText};
//! use domain::LanguageCode;
//!
//! let client = SpeechClient::from_config(&config);
//! let transcript = client.transcribe(AudioData::new(bytes), &LanguageCode::default()).await?;
//! println!("Transcribed: {}", transcript.full_transcript());
//! ```

pub mod client;
pub mod config;
pub mod duration;
pub mod error;
pub mod ports;
pub mod providers;
pub mod types;
pub mod wav;

pub use client::SpeechClient;
pub use config::{RetryConfig, SpeechConfig, SpeechMode, TtsConfig};
pub use duration::parse_duration_secs;
pub use error::SpeechError;
pub use ports::{SpeechToText, TextToSpeech};
pub use providers::{CloudSpeechProvider, GeminiTranscriber, GoogleTranslateTts};
pub use types::{AudioData, AudioFormat};
pub use wav::WavInfo;
