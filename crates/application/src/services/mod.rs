//! Application services - Use case implementations

mod audio_batch_service;
mod transcription_service;

pub use audio_batch_service::{AudioBatchConfig, AudioBatchService, BatchReport, BatchRun};
pub use transcription_service::{
    RecommendationContext, TranscriberStatus, TranscriptionOutcome, TranscriptionService,
};
