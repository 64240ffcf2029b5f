//! Speech synthesis port - Interface for text-to-speech

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for text-to-speech synthesis
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SpeechSynthesisPort: Send + Sync {
    /// Synthesize `text` in `language` and return MP3 bytes
    async fn synthesize(&self, text: String, language: String)
    -> Result<Vec<u8>, ApplicationError>;
}
