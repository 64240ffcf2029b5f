//! `transcribe` command and shared transcription helpers

use std::path::{Path, PathBuf};
use std::sync::Arc;

use ai_speech::{SpeechConfig, SpeechMode};
use application::{TranscriptionRequest, TranscriptionService};
use domain::{LanguageCode, TranscriptSegment, TranscriptSet};
use infrastructure::SpeechAdapter;
use serde::Serialize;

/// Speech settings with an optional credentials override
///
/// A credentials file switches to the Cloud Speech SDK backend.
pub fn speech_config(base: &SpeechConfig, credentials: Option<PathBuf>) -> SpeechConfig {
    let mut speech = base.clone();
    if let Some(path) = credentials.filter(|p| p.as_os_str() != "USE_API_KEY") {
        speech.mode = SpeechMode::Sdk;
        speech.credentials_path = Some(path);
    }
    speech
}

/// Transcription service backed by the configured client
pub fn service(speech: &SpeechConfig) -> anyhow::Result<TranscriptionService> {
    let adapter = SpeechAdapter::from_config(speech);
    if let Some(reason) = adapter.not_ready_reason() {
        anyhow::bail!("Speech client not ready: {reason}");
    }
    Ok(TranscriptionService::new(Arc::new(adapter)))
}

/// Saved next to the audio file
#[derive(Debug, Serialize)]
struct SavedTranscription<'a> {
    file: String,
    language: &'a str,
    full_transcript: String,
    results: &'a [TranscriptSegment],
}

/// `recording.wav` → `recording_transcription.json` in the same directory
pub fn output_path(file: &Path) -> PathBuf {
    let stem = file
        .file_stem()
        .map_or_else(|| "audio".into(), |s| s.to_string_lossy());
    file.with_file_name(format!("{stem}_transcription.json"))
}

/// Transcribe one file with an existing service
pub async fn transcribe_with(
    service: &TranscriptionService,
    file: &Path,
    language: &LanguageCode,
) -> anyhow::Result<TranscriptSet> {
    let audio = tokio::fs::read(file)
        .await
        .map_err(|e| anyhow::anyhow!("Cannot read {}: {e}", file.display()))?;
    let request = TranscriptionRequest::new(audio).with_language(language.clone());
    Ok(service.transcribe(request).await?)
}

/// Print transcripts with confidence and word timing
pub fn print_transcripts(transcripts: &TranscriptSet) {
    if transcripts.is_empty() {
        println!("⚠️  No speech recognized");
        return;
    }

    println!("📝 Transcript: {}", transcripts.full_transcript());
    for (i, segment) in transcripts.segments().iter().enumerate() {
        println!(
            "   [{}] {} (confidence {:.2})",
            i + 1,
            segment.transcript,
            segment.confidence
        );
        for word in segment.words.iter().flatten() {
            println!(
                "       {:>7.2}s - {:>7.2}s  {}",
                word.start_time, word.end_time, word.word
            );
        }
    }
    if let Some(avg) = transcripts.average_confidence() {
        println!("   Average confidence: {avg:.2}");
    }
}

/// Write the transcription JSON next to `file`, returning its path
pub async fn save_transcription(
    file: &Path,
    language: &LanguageCode,
    transcripts: &TranscriptSet,
) -> anyhow::Result<PathBuf> {
    let saved = SavedTranscription {
        file: file.display().to_string(),
        language: language.as_str(),
        full_transcript: transcripts.full_transcript(),
        results: transcripts.segments(),
    };
    let path = output_path(file);
    tokio::fs::write(&path, serde_json::to_string_pretty(&saved)?).await?;
    Ok(path)
}

/// `transcribe` command
pub async fn transcribe_file(speech: &SpeechConfig, file: &Path, language: &str) -> anyhow::Result<()> {
    let language = LanguageCode::parse(language)?;
    let service = service(speech)?;

    println!("🎧 Transcribing {} ({language})", file.display());
    let transcripts = transcribe_with(&service, file, &language).await?;
    print_transcripts(&transcripts);

    let saved = save_transcription(file, &language, &transcripts).await?;
    println!("💾 Saved {}", saved.display());
    Ok(())
}
