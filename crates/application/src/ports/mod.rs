//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod audio_store;
mod corpus_store;
mod recommendation_port;
mod synthesis_port;
mod transcription_port;

#[cfg(test)]
pub use audio_store::MockAudioStore;
pub use audio_store::AudioStore;
#[cfg(test)]
pub use corpus_store::MockCorpusStore;
pub use corpus_store::CorpusStore;
#[cfg(test)]
pub use recommendation_port::MockRecommendationPort;
pub use recommendation_port::{RecommendationPort, RecommendationRequest};
#[cfg(test)]
pub use synthesis_port::MockSpeechSynthesisPort;
pub use synthesis_port::SpeechSynthesisPort;
#[cfg(test)]
pub use transcription_port::MockTranscriptionPort;
pub use transcription_port::{TranscriptionPort, TranscriptionRequest};
