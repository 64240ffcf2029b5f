//! Infrastructure adapters
//!
//! Adapters connect application ports to concrete implementations.

mod fs_audio_store;
mod json_corpus_store;
mod recommendation_adapter;
mod speech_adapter;
mod tts_adapter;

pub use fs_audio_store::FsAudioStore;
pub use json_corpus_store::JsonCorpusStore;
pub use recommendation_adapter::HttpRecommendationAdapter;
pub use speech_adapter::SpeechAdapter;
pub use tts_adapter::TtsAdapter;
