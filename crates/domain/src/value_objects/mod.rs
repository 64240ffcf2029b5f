//! Value objects - Immutable objects defined by their attributes

mod dialogue_id;
mod language_code;

pub use dialogue_id::DialogueId;
pub use language_code::LanguageCode;
