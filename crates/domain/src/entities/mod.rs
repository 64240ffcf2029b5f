//! Domain entities

mod dialogue_corpus;
mod transcript;

pub use dialogue_corpus::{Conversation, DialogueCorpus, DialogueLine, audio_file_name};
pub use transcript::{TranscriptSegment, TranscriptSet, WordTiming};
