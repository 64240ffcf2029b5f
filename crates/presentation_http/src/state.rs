//! Application state shared across handlers

use std::sync::Arc;

use application::TranscriptionService;

/// Shared application state
#[derive(Debug, Clone)]
pub struct AppState {
    /// Transcription with optional recommendation lookup
    pub transcription: Arc<TranscriptionService>,
}

impl AppState {
    pub fn new(transcription: TranscriptionService) -> Self {
        Self {
            transcription: Arc::new(transcription),
        }
    }
}
